//! LLM types — provider-neutral messages, responses and errors.
//!
//! The answer service only needs plain text in and plain text out, so
//! messages carry a single string and responses are reduced to their text
//! segments by each provider's parser. Retrieval needs one more capability,
//! turning text into vectors, behind the separate [`Embedder`] trait.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid LLM config: {0}")]
    Config(String),

    /// `var` is the variable that was looked up, which may be the indirect
    /// one named by `LLM_API_KEY_ENV`.
    #[error("no API key: {var} is not set")]
    MissingApiKey { var: String },

    #[error("request to LLM provider failed: {0}")]
    Transport(String),

    #[error("LLM provider returned status {status}")]
    Status { status: u16, body: String },

    #[error("unreadable LLM response: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl LlmError {
    /// Whether a later attempt could plausibly succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_owned(), content: content.into() }
    }
}

/// Response from an LLM chat call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    /// Text segments in the order the provider returned them.
    pub text: Vec<String>,
    pub model: String,
    /// Normalized: `end_turn` or `max_tokens`.
    pub stop_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl ChatResponse {
    /// All text segments joined with no separator.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.text.concat()
    }
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// One text completion per call. Implemented by each provider client and by test doubles.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Ask for a reply to `messages` under the `system` instruction.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the response is malformed.
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError>;
}

// =============================================================================
// EMBEDDER TRAIT
// =============================================================================

/// Maps texts to embedding vectors.
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the provider returns
    /// a different number of vectors than it was given texts.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
