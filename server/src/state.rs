//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The answer service is optional: when the corpus or the LLM cannot be set
//! up at boot, the server still starts and the answer route reports 503.

use std::sync::Arc;

use crate::services::answer::AnswerService;

/// Clone is required by Axum; the service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub answers: Option<Arc<AnswerService>>,
}

impl AppState {
    #[must_use]
    pub fn new(answers: Option<AnswerService>) -> Self {
        Self { answers: answers.map(Arc::new) }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
