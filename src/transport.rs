//! Query transport — one outbound call per submission.
//!
//! DESIGN
//! ======
//! `QueryTransport` is the seam between the form controller and the network.
//! The controller never sees HTTP: it hands over a [`QueryPayload`] and gets
//! back either the answer text or a typed [`TransportError`]. Tests swap in
//! scripted transports through the same trait.
//!
//! WIRE CONTRACT
//! =============
//! `POST {base_url}/process_form` with a multipart body holding exactly one
//! text field, `query`. A 2xx response carries a JSON object whose string
//! field `response` is the answer. No retries. No timeout unless one is
//! configured.

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;

use std::time::Duration;

use serde::Deserialize;

/// Path of the query-processing endpoint, appended to the base URL.
pub const PROCESS_FORM_PATH: &str = "/process_form";

/// Name of the single multipart field carrying the query.
pub const QUERY_FIELD: &str = "query";


// =============================================================================
// ERROR
// =============================================================================

/// Ways a submission can fail to produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never completed (connect, DNS, IO).
    #[error("request failed: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// A 2xx body that is not JSON or has no string `response` field.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// Single-field payload sent for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPayload {
    pub query: String,
}

impl QueryPayload {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }

    fn into_form(self) -> reqwest::multipart::Form {
        reqwest::multipart::Form::new().text(QUERY_FIELD, self.query)
    }
}

/// Full endpoint URL for a configured base URL.
#[must_use]
pub fn endpoint(base_url: &str) -> String {
    format!("{}{PROCESS_FORM_PATH}", base_url.trim_end_matches('/'))
}

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// Performs the outbound call for one submission.
#[async_trait::async_trait]
pub trait QueryTransport: Send + Sync {
    /// Send `payload` to the backend rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the call fails, the status is not a
    /// success, or the body carries no answer.
    async fn send(&self, base_url: &str, payload: &QueryPayload) -> Result<String, TransportError>;
}

// =============================================================================
// HTTP TRANSPORT
// =============================================================================

/// `reqwest`-backed transport speaking the `/process_form` contract.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport. `timeout` of `None` lets a call wait indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client fails to build.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let builder = reqwest::Client::builder();
        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        let http = builder
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl QueryTransport for HttpTransport {
    async fn send(&self, base_url: &str, payload: &QueryPayload) -> Result<String, TransportError> {
        let url = endpoint(base_url);
        tracing::debug!(%url, query_len = payload.query.len(), "sending query");

        let response = self
            .http
            .post(&url)
            .multipart(payload.clone().into_form())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), body: text });
        }

        parse_answer(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Success body. Fields other than `response` are ignored.
#[derive(Deserialize)]
struct AnswerBody {
    response: String,
}

/// Extract the answer text from a success body.
pub(crate) fn parse_answer(body: &str) -> Result<String, TransportError> {
    serde_json::from_str::<AnswerBody>(body)
        .map(|parsed| parsed.response)
        .map_err(|e| TransportError::MalformedBody(e.to_string()))
}
