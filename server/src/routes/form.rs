//! Form-processing route.
//!
//! DESIGN
//! ======
//! `POST /process_form` accepts the two encodings an HTML form can post:
//! `multipart/form-data` and `application/x-www-form-urlencoded`. Only the
//! first `query` field is read; every other field is ignored. The reply is
//! always a JSON object: `{"response": ...}` on success, `{"error": ...}`
//! otherwise. Any other body type counts as a missing query.

use axum::Form;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::warn;

use crate::services::answer::AnswerError;
use crate::state::AppState;

pub const QUERY_FIELD: &str = "query";
pub const MISSING_QUERY: &str = "query field is missing";
pub const NOT_CONFIGURED: &str = "answer service not configured";
pub const ENGINE_FAILED: &str = "answer engine failed";

#[derive(Serialize)]
pub struct AnswerBody {
    pub response: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

fn error(status: StatusCode, message: &'static str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

/// `POST /process_form` — answer the submitted `query` field.
pub async fn process_form(State(state): State<AppState>, request: Request) -> Response {
    let Some(query) = read_query(request).await else {
        return error(StatusCode::BAD_REQUEST, MISSING_QUERY);
    };

    let Some(answers) = state.answers.as_ref() else {
        return error(StatusCode::SERVICE_UNAVAILABLE, NOT_CONFIGURED);
    };

    match answers.answer(&query).await {
        Ok(response) => Json(AnswerBody { response }).into_response(),
        Err(e) => {
            warn!(error = %e, "process_form: answer failed");
            error(answer_error_to_status(&e), ENGINE_FAILED)
        }
    }
}

// =============================================================================
// BODY DECODING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormEncoding {
    Multipart,
    UrlEncoded,
}

impl FormEncoding {
    /// Encoding named by a `Content-Type` value, ignoring parameters and case.
    pub(crate) fn from_content_type(value: &str) -> Option<Self> {
        let mime = value.split(';').next().unwrap_or_default().trim();
        if mime.eq_ignore_ascii_case("multipart/form-data") {
            Some(Self::Multipart)
        } else if mime.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            Some(Self::UrlEncoded)
        } else {
            None
        }
    }
}

/// First `query` field in the body. `None` covers an absent field, an
/// unsupported content type and an undecodable body alike.
async fn read_query(request: Request) -> Option<String> {
    let encoding = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(FormEncoding::from_content_type)?;

    match encoding {
        FormEncoding::Multipart => {
            let multipart = Multipart::from_request(request, &()).await.ok()?;
            first_multipart_query(multipart).await.ok().flatten()
        }
        FormEncoding::UrlEncoded => {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &()).await.ok()?;
            first_query(pairs)
        }
    }
}

pub(crate) fn first_query(pairs: Vec<(String, String)>) -> Option<String> {
    pairs.into_iter().find(|(name, _)| name == QUERY_FIELD).map(|(_, value)| value)
}

async fn first_multipart_query(mut multipart: Multipart) -> Result<Option<String>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(QUERY_FIELD) {
            return field.text().await.map(Some);
        }
    }
    Ok(None)
}

pub(crate) fn answer_error_to_status(err: &AnswerError) -> StatusCode {
    if err.retryable() { StatusCode::SERVICE_UNAVAILABLE } else { StatusCode::BAD_GATEWAY }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
