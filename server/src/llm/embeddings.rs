//! OpenAI-compatible embeddings client.
//!
//! One `POST {base_url}/embeddings` per call with the whole slice as `input`.
//! Batching is the caller's job; see `VectorIndex::build`.

use serde::{Deserialize, Serialize};

use super::types::{Embedder, LlmError};

pub struct OpenAiEmbedder {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEmbedder {
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: String, model: String, base_url: String) -> Self {
        Self { http, api_key, model, base_url }
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait::async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = EmbeddingsRequest { model: &self.model, input: texts };
        let request = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);
        parse_embeddings_response(&super::send(request).await?, texts.len())
    }
}

/// Vectors from an `/embeddings` body, reordered by their `index` field.
pub(crate) fn parse_embeddings_response(json_text: &str, expected: usize) -> Result<Vec<Vec<f32>>, LlmError> {
    let mut parsed: EmbeddingsResponse =
        serde_json::from_str(json_text).map_err(|e| LlmError::Parse(format!("embeddings: {e}")))?;
    if parsed.data.len() != expected {
        return Err(LlmError::Parse(format!(
            "embeddings: expected {expected} vectors, got {}",
            parsed.data.len()
        )));
    }
    parsed.data.sort_by_key(|item| item.index);
    Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
}

#[cfg(test)]
#[path = "embeddings_test.rs"]
mod tests;
