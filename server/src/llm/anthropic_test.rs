use super::*;
use serde_json::json;

fn message(blocks: &serde_json::Value, stop_reason: &str) -> String {
    json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-5-20250929",
        "content": blocks,
        "stop_reason": stop_reason,
        "usage": { "input_tokens": 640, "output_tokens": 18 }
    })
    .to_string()
}

#[test]
fn text_blocks_become_segments() {
    let body = message(
        &json!([
            { "type": "text", "text": "Yes, " },
            { "type": "text", "text": "very much." }
        ]),
        "end_turn",
    );
    let resp = parse_response(&body).unwrap();
    assert_eq!(resp.text, vec!["Yes, ".to_owned(), "very much.".to_owned()]);
    assert_eq!(resp.joined_text(), "Yes, very much.");
    assert_eq!(resp.model, "claude-sonnet-4-5-20250929");
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!((resp.input_tokens, resp.output_tokens), (640, 18));
}

#[test]
fn non_text_blocks_are_dropped() {
    let body = message(
        &json!([
            { "type": "thinking", "thinking": "scan the tweets", "signature": "sig" },
            { "type": "text", "text": "Mostly sitcoms." },
            { "type": "brand_new_block", "payload": [1, 2, 3] }
        ]),
        "end_turn",
    );
    assert_eq!(parse_response(&body).unwrap().joined_text(), "Mostly sitcoms.");
}

#[test]
fn max_tokens_stop_is_kept() {
    let body = message(&json!([{ "type": "text", "text": "The author" }]), "max_tokens");
    assert_eq!(parse_response(&body).unwrap().stop_reason, "max_tokens");
}

#[test]
fn other_stop_reasons_normalize_to_end_turn() {
    let body = message(&json!([{ "type": "text", "text": "ok" }]), "stop_sequence");
    assert_eq!(parse_response(&body).unwrap().stop_reason, "end_turn");
}

#[test]
fn error_envelope_is_parse_error() {
    let body = json!({ "type": "error", "error": { "type": "overloaded_error" } }).to_string();
    assert!(matches!(parse_response(&body), Err(LlmError::Parse(_))));
}
