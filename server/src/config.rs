//! Server configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORPUS_PATH: &str = "tinytweets.json";
pub const DEFAULT_CORPUS_FIELD: &str = "full_text";
/// Tweets are short, so the context takes more of them than a typical RAG setup.
pub const DEFAULT_QUERY_TOP_K: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub corpus_path: PathBuf,
    pub corpus_field: String,
    pub top_k: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            corpus_field: DEFAULT_CORPUS_FIELD.to_owned(),
            top_k: DEFAULT_QUERY_TOP_K,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Keys: `PORT`, `CORPUS_PATH`, `CORPUS_FIELD`, `QUERY_TOP_K`. Blank or
    /// unparseable values keep their defaults, and so does a `QUERY_TOP_K`
    /// of zero.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(port) = get("PORT").and_then(|v| v.parse().ok()) {
            cfg.port = port;
        }
        if let Some(path) = get("CORPUS_PATH") {
            cfg.corpus_path = PathBuf::from(path);
        }
        if let Some(field) = get("CORPUS_FIELD") {
            cfg.corpus_field = field;
        }
        if let Some(k) = get("QUERY_TOP_K").and_then(|v| v.parse::<usize>().ok()).filter(|k| *k > 0) {
            cfg.top_k = k;
        }
        cfg
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
