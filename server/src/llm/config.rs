//! Provider selection and credentials for the answer and embedding models.
//!
//! Values come from a key lookup so the parsing can be exercised without
//! touching the process environment; the `from_env` constructors plug in
//! `std::env::var`.

use std::str::FromStr;
use std::time::Duration;

use super::types::LlmError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 100;

/// Names the variable that holds the key, not the key itself.
pub const API_KEY_ENV_VAR: &str = "LLM_API_KEY_ENV";
/// Same indirection for the embedding key. Falls back to [`API_KEY_ENV_VAR`].
pub const EMBEDDING_API_KEY_ENV_VAR: &str = "EMBEDDING_API_KEY_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    Anthropic,
    #[default]
    OpenAi,
}

impl Provider {
    fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-5-20250929",
            Self::OpenAi => "gpt-4o-mini",
        }
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(LlmError::Config(format!("unknown LLM_PROVIDER: {other}"))),
        }
    }
}

/// Which OpenAI-compatible endpoint family to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenAiApiMode {
    #[default]
    ChatCompletions,
    Responses,
}

impl FromStr for OpenAiApiMode {
    type Err = LlmError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "chat_completions" => Ok(Self::ChatCompletions),
            "responses" => Ok(Self::Responses),
            other => Err(LlmError::Config(format!(
                "unsupported openai_api mode '{other}' (expected 'chat_completions' or 'responses')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl Default for LlmTimeouts {
    fn default() -> Self {
        Self { request: DEFAULT_REQUEST_TIMEOUT, connect: DEFAULT_CONNECT_TIMEOUT }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    pub openai_mode: OpenAiApiMode,
    /// No trailing slash; request paths are appended directly.
    pub openai_base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Read the config from process environment variables.
    ///
    /// # Errors
    ///
    /// See [`LlmConfig::from_lookup`].
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup.
    ///
    /// Keys: `LLM_API_KEY_ENV` (required; names the variable holding the
    /// key), `LLM_PROVIDER`, `LLM_MODEL`, `LLM_OPENAI_MODE`,
    /// `LLM_OPENAI_BASE_URL`, `LLM_REQUEST_TIMEOUT_SECS`,
    /// `LLM_CONNECT_TIMEOUT_SECS`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if no key can be found or the provider or API mode
    /// is not recognized.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = get("LLM_PROVIDER").map_or(Ok(Provider::default()), |v| v.parse())?;
        let openai_mode = get("LLM_OPENAI_MODE").map_or(Ok(OpenAiApiMode::default()), |v| v.parse())?;

        let key_var = get(API_KEY_ENV_VAR).ok_or_else(|| LlmError::MissingApiKey { var: API_KEY_ENV_VAR.into() })?;
        let api_key = get(&key_var).ok_or(LlmError::MissingApiKey { var: key_var })?;

        let model = get("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_owned());
        let openai_base_url = get("LLM_OPENAI_BASE_URL")
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_owned();

        Ok(Self { provider, api_key, model, openai_mode, openai_base_url, timeouts: timeouts(&get) })
    }
}

// =============================================================================
// EMBEDDINGS
// =============================================================================

/// Where embeddings come from. Only OpenAI-compatible `/embeddings` is spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    OpenAi,
    Disabled,
}

impl FromStr for EmbeddingProvider {
    type Err = LlmError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "openai" => Ok(Self::OpenAi),
            "none" => Ok(Self::Disabled),
            other => Err(LlmError::Config(format!("unknown EMBEDDING_PROVIDER: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub model: String,
    /// No trailing slash; `/embeddings` is appended.
    pub base_url: String,
    /// Texts per request while indexing the corpus.
    pub batch_size: usize,
    pub timeouts: LlmTimeouts,
}

impl EmbeddingConfig {
    /// Read the config from process environment variables.
    ///
    /// # Errors
    ///
    /// See [`EmbeddingConfig::from_lookup`].
    pub fn from_env() -> Result<Option<Self>, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `Ok(None)` means embeddings
    /// are off and retrieval stays lexical.
    ///
    /// `EMBEDDING_PROVIDER` picks `openai` or `none`. When unset, embeddings
    /// are on if `EMBEDDING_API_KEY_ENV` is set or the answer model itself is
    /// served by OpenAI. The key is found through `EMBEDDING_API_KEY_ENV`,
    /// else `LLM_API_KEY_ENV`. Other keys: `EMBEDDING_MODEL`,
    /// `EMBEDDING_BASE_URL` (else `LLM_OPENAI_BASE_URL`),
    /// `EMBEDDING_BATCH_SIZE`, and the `LLM_*_TIMEOUT_SECS` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if embeddings are on but no key can be found, or a
    /// provider name is not recognized.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, LlmError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let explicit_key_var = get(EMBEDDING_API_KEY_ENV_VAR);
        let provider = match get("EMBEDDING_PROVIDER") {
            Some(raw) => raw.parse::<EmbeddingProvider>()?,
            None => {
                let llm_provider = get("LLM_PROVIDER").map_or(Ok(Provider::default()), |v| v.parse())?;
                if explicit_key_var.is_some() || llm_provider == Provider::OpenAi {
                    EmbeddingProvider::OpenAi
                } else {
                    EmbeddingProvider::Disabled
                }
            }
        };
        if provider == EmbeddingProvider::Disabled {
            return Ok(None);
        }

        let key_var = explicit_key_var
            .or_else(|| get(API_KEY_ENV_VAR))
            .ok_or_else(|| LlmError::MissingApiKey { var: EMBEDDING_API_KEY_ENV_VAR.into() })?;
        let api_key = get(&key_var).ok_or(LlmError::MissingApiKey { var: key_var })?;

        let model = get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_owned());
        let base_url = get("EMBEDDING_BASE_URL")
            .or_else(|| get("LLM_OPENAI_BASE_URL"))
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        let batch_size = get("EMBEDDING_BATCH_SIZE")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_EMBEDDING_BATCH_SIZE);

        Ok(Some(Self { api_key, model, base_url, batch_size, timeouts: timeouts(&get) }))
    }
}

fn timeouts(get: &impl Fn(&str) -> Option<String>) -> LlmTimeouts {
    let secs = |key: &str, fallback: Duration| {
        get(key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(fallback, Duration::from_secs)
    };
    LlmTimeouts {
        request: secs("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT),
        connect: secs("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
