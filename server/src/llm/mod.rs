//! LLM — text-only chat adapter for the answer service.
//!
//! DESIGN
//! ======
//! Configured purely from environment variables. [`connect`] turns an
//! [`LlmConfig`] into one provider client behind the [`LlmChat`] trait, so
//! the rest of the server never names a provider and tests can hand in a
//! canned model instead. [`connect_embedder`] does the same for the
//! [`Embedder`] used by retrieval. All clients share the HTTP plumbing below;
//! they differ only in request shape and response parsing.

pub mod anthropic;
pub mod config;
pub mod embeddings;
pub mod openai;
pub mod types;

use std::sync::Arc;

use config::{EmbeddingConfig, LlmConfig, LlmTimeouts, Provider};
pub use types::{Embedder, LlmChat};
use types::LlmError;

/// Build the configured provider client.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to build.
pub fn connect(config: LlmConfig) -> Result<Arc<dyn LlmChat>, LlmError> {
    let http = http_client(config.timeouts)?;
    Ok(match config.provider {
        Provider::Anthropic => Arc::new(anthropic::AnthropicClient::new(http, config.api_key, config.model)),
        Provider::OpenAi => Arc::new(openai::OpenAiClient::new(
            http,
            config.api_key,
            config.model,
            config.openai_mode,
            config.openai_base_url,
        )),
    })
}

/// Build the embeddings client.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to build.
pub fn connect_embedder(config: EmbeddingConfig) -> Result<Arc<dyn Embedder>, LlmError> {
    let http = http_client(config.timeouts)?;
    Ok(Arc::new(embeddings::OpenAiEmbedder::new(http, config.api_key, config.model, config.base_url)))
}

// =============================================================================
// SHARED HTTP
// =============================================================================

fn http_client(timeouts: LlmTimeouts) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeouts.request)
        .connect_timeout(timeouts.connect)
        .build()
        .map_err(|e| LlmError::ClientBuild(e.to_string()))
}

/// Send a prepared request and return the body of a 200 response.
async fn send(request: reqwest::RequestBuilder) -> Result<String, LlmError> {
    let response = request
        .send()
        .await
        .map_err(|e| LlmError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| LlmError::Transport(e.to_string()))?;
    match status {
        200 => Ok(body),
        _ => Err(LlmError::Status { status, body }),
    }
}
