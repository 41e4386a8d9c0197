//! Answer service — question in, text answer out.
//!
//! DESIGN
//! ======
//! Retrieves the top-k corpus documents for the question, numbers them into
//! a context block, and asks the LLM for a single plain-text answer grounded
//! in that context. A model reply with no text becomes `EMPTY_ANSWER` so the
//! caller always has something to show.
//!
//! RETRIEVAL
//! =========
//! With a [`VectorIndex`] attached, the question is embedded and the nearest
//! documents by cosine similarity form the context. Without one, the
//! corpus's lexical ranking is used. A blank question is never embedded; it
//! gets an empty context.

use std::fmt::Write;
use std::sync::Arc;

use tracing::info;

use super::corpus::Corpus;
use super::index::VectorIndex;
use crate::llm::types::{LlmError, Message};
use crate::llm::{Embedder, LlmChat};

pub const DEFAULT_ANSWER_MAX_TOKENS: u32 = 1024;
pub const EMPTY_ANSWER: &str = "Empty Response";

const SYSTEM_PROMPT: &str = "You answer questions about one person using only the tweets they wrote. \
The tweets are given between <context> tags. Answer in plain prose, speak about the author in the \
third person, and say so when the tweets do not cover the question.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("embedding error: {0}")]
    Embedding(LlmError),
}

impl AnswerError {
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) | Self::Embedding(e) => e.retryable(),
        }
    }
}

enum Retrieval {
    Lexical,
    Vector { index: VectorIndex, embedder: Arc<dyn Embedder> },
}

pub struct AnswerService {
    corpus: Corpus,
    llm: Arc<dyn LlmChat>,
    retrieval: Retrieval,
    top_k: usize,
    max_tokens: u32,
}

impl AnswerService {
    /// Service with lexical retrieval.
    #[must_use]
    pub fn new(corpus: Corpus, llm: Arc<dyn LlmChat>, top_k: usize) -> Self {
        Self { corpus, llm, retrieval: Retrieval::Lexical, top_k, max_tokens: DEFAULT_ANSWER_MAX_TOKENS }
    }

    /// Switch to embedding retrieval. `index` must have been built from this
    /// service's corpus.
    #[must_use]
    pub fn with_vector_index(mut self, index: VectorIndex, embedder: Arc<dyn Embedder>) -> Self {
        self.retrieval = Retrieval::Vector { index, embedder };
        self
    }

    #[must_use]
    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    /// `"vector"` or `"lexical"`, for logs.
    #[must_use]
    pub fn retrieval_mode(&self) -> &'static str {
        match self.retrieval {
            Retrieval::Lexical => "lexical",
            Retrieval::Vector { .. } => "vector",
        }
    }

    // =========================================================================
    // MAIN ENTRY POINT
    // =========================================================================

    /// Answer `question` from the corpus.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the question or the LLM call fails.
    pub async fn answer(&self, question: &str) -> Result<String, AnswerError> {
        let context = self.retrieve(question).await?;
        info!(
            question_len = question.len(),
            context_docs = context.len(),
            retrieval = self.retrieval_mode(),
            "answer: retrieved context"
        );

        let prompt = build_user_prompt(question, &context);
        let response = self
            .llm
            .chat(self.max_tokens, SYSTEM_PROMPT, &[Message::user(prompt)])
            .await?;

        info!(
            model = %response.model,
            stop_reason = %response.stop_reason,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "answer: LLM response"
        );

        let text = response.joined_text();
        let text = text.trim();
        if text.is_empty() {
            return Ok(EMPTY_ANSWER.to_owned());
        }
        Ok(text.to_owned())
    }
}

// =============================================================================
// RETRIEVAL
// =============================================================================

impl AnswerService {
    async fn retrieve(&self, question: &str) -> Result<Vec<&str>, AnswerError> {
        let (index, embedder) = match &self.retrieval {
            Retrieval::Lexical => return Ok(self.corpus.top_k(question, self.top_k)),
            Retrieval::Vector { index, embedder } => (index, embedder),
        };
        if question.trim().is_empty() || self.top_k == 0 || index.is_empty() {
            return Ok(Vec::new());
        }

        let query = embedder
            .embed(&[question.to_owned()])
            .await
            .map_err(AnswerError::Embedding)?
            .pop()
            .ok_or_else(|| AnswerError::Embedding(LlmError::Parse("no vector for question".to_owned())))?;
        if query.len() != index.dimension() {
            return Err(AnswerError::Embedding(LlmError::Parse(format!(
                "question embedding has {} dimensions, index has {}",
                query.len(),
                index.dimension()
            ))));
        }

        Ok(index
            .nearest(&query, self.top_k)
            .into_iter()
            .filter_map(|idx| self.corpus.get(idx))
            .collect())
    }
}

// =============================================================================
// PROMPT
// =============================================================================

fn build_user_prompt(question: &str, context: &[&str]) -> String {
    let mut out = String::from("<context>\n");
    if context.is_empty() {
        out.push_str("(no matching tweets)\n");
    }
    for (i, doc) in context.iter().enumerate() {
        let _ = writeln!(out, "[{}] {}", i + 1, doc.trim());
    }
    out.push_str("</context>\n\n");
    let _ = write!(out, "<question>{question}</question>");
    out
}

#[cfg(test)]
#[path = "answer_test.rs"]
mod tests;
