use super::*;
use crate::services::corpus::Corpus;
use crate::llm::types::{ChatResponse, LlmChat, LlmError, Message};

struct SilentLlm;

#[async_trait::async_trait]
impl LlmChat for SilentLlm {
    async fn chat(&self, _max_tokens: u32, _system: &str, _messages: &[Message]) -> Result<ChatResponse, LlmError> {
        Err(LlmError::Transport("unused".into()))
    }
}

#[test]
fn new_without_service_is_unconfigured() {
    assert!(AppState::new(None).answers.is_none());
}

#[test]
fn clones_share_the_service() {
    let service = AnswerService::new(Corpus::default(), Arc::new(SilentLlm), 20);
    let state = AppState::new(Some(service));
    let copy = state.clone();
    let (Some(a), Some(b)) = (&state.answers, &copy.answers) else {
        panic!("service missing");
    };
    assert!(Arc::ptr_eq(a, b));
}
