//! Corpus — the document set the answer service retrieves from.
//!
//! DESIGN
//! ======
//! The corpus is a JSON array of objects exported from a tweet archive.
//! One string field per object (`full_text` by default) becomes a document;
//! objects without it are skipped. Document positions are stable, so a
//! `VectorIndex` built from the corpus can refer to documents by position.
//!
//! [`Corpus::top_k`] is the lexical fallback used when no embedding provider
//! is configured: each document is scored by how many distinct query terms
//! it contains. Terms are lowercase alphanumeric runs of at least two
//! characters, minus a small stopword set. Ties keep corpus order and
//! zero-score documents never come back.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

const STOPWORDS: &[&str] = &[
    "about", "an", "and", "are", "as", "at", "be", "but", "by", "do", "does", "for", "from", "has", "have", "he", "her",
    "his", "how", "if", "in", "is", "it", "its", "me", "my", "of", "on", "or", "she", "so", "that", "the", "their",
    "them", "they", "this", "to", "was", "we", "were", "what", "when", "where", "which", "who", "why", "will", "with",
    "you", "your",
];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path}: {message}")]
    Io { path: String, message: String },
    #[error("corpus is not valid JSON: {0}")]
    Parse(String),
    #[error("corpus must be a JSON array of objects")]
    NotAnArray,
}

#[derive(Debug, Clone)]
struct Document {
    text: String,
    terms: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    docs: Vec<Document>,
}

// =============================================================================
// LOADING
// =============================================================================

impl Corpus {
    /// Read and parse a corpus file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array.
    pub fn load(path: &Path, field: &str) -> Result<Self, CorpusError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CorpusError::Io { path: path.display().to_string(), message: e.to_string() })?;
        Self::from_json(&raw, field)
    }

    /// Parse a corpus from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or not an array.
    pub fn from_json(raw: &str, field: &str) -> Result<Self, CorpusError> {
        let root: Value = serde_json::from_str(raw).map_err(|e| CorpusError::Parse(e.to_string()))?;
        let Value::Array(items) = root else {
            return Err(CorpusError::NotAnArray);
        };

        let texts = items
            .iter()
            .filter_map(|item| item.get(field).and_then(Value::as_str))
            .map(str::to_owned);
        Ok(Self::from_texts(texts))
    }

    #[must_use]
    pub fn from_texts(texts: impl IntoIterator<Item = String>) -> Self {
        let docs = texts
            .into_iter()
            .map(|text| {
                let terms = terms(&text);
                Document { text, terms }
            })
            .collect();
        Self { docs }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Document text at `idx`, in load order.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.docs.get(idx).map(|doc| doc.text.as_str())
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.docs.iter().map(|doc| doc.text.as_str())
    }

    // =========================================================================
    // RETRIEVAL
    // =========================================================================

    /// Up to `k` documents most relevant to `query`, best first.
    #[must_use]
    pub fn top_k(&self, query: &str, k: usize) -> Vec<&str> {
        let wanted = terms(query);
        if wanted.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize)> = self
            .docs
            .iter()
            .enumerate()
            .filter_map(|(idx, doc)| {
                let score = wanted.iter().filter(|t| doc.terms.contains(*t)).count();
                (score > 0).then_some((idx, score))
            })
            .collect();

        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
            .into_iter()
            .take(k)
            .map(|(idx, _)| self.docs[idx].text.as_str())
            .collect()
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() >= 2 && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

#[cfg(test)]
#[path = "corpus_test.rs"]
mod tests;
