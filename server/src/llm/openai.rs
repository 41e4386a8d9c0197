//! OpenAI-compatible API client.
//!
//! Supports both `/chat/completions` and `/responses` endpoints, text only.
//! Any server speaking either dialect works through `LLM_OPENAI_BASE_URL`.

use serde::Serialize;
use serde_json::Value;

use super::config::OpenAiApiMode;
use super::types::{ChatResponse, LlmChat, LlmError, Message};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    mode: OpenAiApiMode,
    base_url: String,
}

impl OpenAiClient {
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: String, model: String, mode: OpenAiApiMode, base_url: String) -> Self {
        Self { http, api_key, model, mode, base_url }
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let request = self
            .http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body);
        super::send(request).await
    }
}

#[async_trait::async_trait]
impl LlmChat for OpenAiClient {
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        let model = self.model.as_str();
        match self.mode {
            OpenAiApiMode::ChatCompletions => {
                let messages = build_chat_completions_messages(system, messages);
                let body = CcRequest { model, max_tokens, messages: &messages };
                parse_chat_completions_response(&self.post("/chat/completions", &body).await?)
            }
            OpenAiApiMode::Responses => {
                let input = build_responses_input(messages);
                let body = RespRequest { model, max_output_tokens: max_tokens, instructions: system, input: &input };
                parse_responses_response(&self.post("/responses", &body).await?)
            }
        }
    }
}

// =============================================================================
// REQUEST SHAPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [Message],
}

fn build_chat_completions_messages(system: &str, messages: &[Message]) -> Vec<Message> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if !system.trim().is_empty() {
        out.push(Message { role: "system".to_owned(), content: system.to_owned() });
    }
    out.extend(messages.iter().cloned());
    out
}

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    max_output_tokens: u32,
    instructions: &'a str,
    input: &'a [RespInputItem],
}

#[derive(Serialize)]
struct RespInputItem {
    #[serde(rename = "type")]
    item_type: &'static str,
    role: String,
    content: Vec<RespTextContent>,
}

#[derive(Serialize)]
struct RespTextContent {
    #[serde(rename = "type")]
    content_type: &'static str,
    text: String,
}

fn build_responses_input(messages: &[Message]) -> Vec<RespInputItem> {
    messages
        .iter()
        .map(|message| RespInputItem {
            item_type: "message",
            role: message.role.clone(),
            content: vec![RespTextContent { content_type: "input_text", text: message.content.clone() }],
        })
        .collect()
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

fn usage(root: &Value, key: &str) -> u64 {
    root.pointer(&format!("/usage/{key}"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// Parsed body plus the model name both dialects report at the top level.
fn envelope(json_text: &str) -> Result<(Value, String), LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::Parse(e.to_string()))?;
    let model = root["model"].as_str().unwrap_or_default().to_owned();
    Ok((root, model))
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_owned())
}

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let (root, model) = envelope(json_text)?;
    let choice = root
        .pointer("/choices/0")
        .ok_or_else(|| LlmError::Parse("chat_completions: missing choices[0]".to_owned()))?;

    let text = choice
        .pointer("/message/content")
        .and_then(Value::as_str)
        .and_then(non_empty)
        .into_iter()
        .collect();
    let truncated = choice["finish_reason"] == "length";

    Ok(ChatResponse {
        text,
        model,
        stop_reason: stop_reason(truncated),
        input_tokens: usage(&root, "prompt_tokens"),
        output_tokens: usage(&root, "completion_tokens"),
    })
}

pub(crate) fn parse_responses_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let (root, model) = envelope(json_text)?;

    let text = match root["output"].as_array() {
        Some(items) => items
            .iter()
            .filter(|item| item["type"] == "message")
            .filter_map(|item| item["content"].as_array())
            .flatten()
            .filter(|part| part["type"] == "output_text" || part["type"] == "text")
            .filter_map(|part| part["text"].as_str().and_then(non_empty))
            .collect(),
        None => root["output_text"].as_str().and_then(non_empty).into_iter().collect(),
    };
    let truncated = root.pointer("/incomplete_details/reason").and_then(Value::as_str) == Some("max_output_tokens");

    Ok(ChatResponse {
        text,
        model,
        stop_reason: stop_reason(truncated),
        input_tokens: usage(&root, "input_tokens"),
        output_tokens: usage(&root, "output_tokens"),
    })
}

fn stop_reason(truncated: bool) -> String {
    let reason = if truncated { "max_tokens" } else { "end_turn" };
    reason.to_owned()
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
