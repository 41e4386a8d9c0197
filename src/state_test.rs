use super::*;

fn answer(text: &str) -> Settlement {
    Settlement::Answer(text.to_owned())
}

fn failure(reason: &str) -> Settlement {
    Settlement::TransportFailure(reason.to_owned())
}

fn submitted(query: &str, policies: Policies) -> FormState {
    let state = reduce(&FormState::default(), Action::SetQuery(query.to_owned()), policies);
    reduce(&state, Action::Submit, policies)
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_state_is_idle_and_empty() {
    let state = FormState::default();
    assert_eq!(state.query, "");
    assert_eq!(state.response_text, "");
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.issued, 0);
    assert_eq!(state.in_flight, 0);
}

#[test]
fn default_policies_drop_stale_and_keep_pending() {
    let policies = Policies::default();
    assert_eq!(policies.settle, SettlePolicy::LatestIssued);
    assert_eq!(policies.failure, FailurePolicy::KeepPending);
}

// =============================================================
// SetQuery
// =============================================================

#[test]
fn set_query_replaces_value_unconditionally() {
    let policies = Policies::default();
    let state = reduce(&FormState::default(), Action::SetQuery("dogs?".into()), policies);
    let state = reduce(&state, Action::SetQuery(String::new()), policies);
    assert_eq!(state.query, "");
    let long = "x".repeat(10_000);
    let state = reduce(&state, Action::SetQuery(long.clone()), policies);
    assert_eq!(state.query, long);
}

#[test]
fn set_query_leaves_response_untouched() {
    let policies = Policies::default();
    let state = submitted("first", policies);
    let state = reduce(&state, Action::SetQuery("second".into()), policies);
    assert_eq!(state.response_text, PENDING_MARKER);
    assert_eq!(state.phase, Phase::Pending);
}

#[test]
fn reduce_does_not_mutate_previous_snapshot() {
    let policies = Policies::default();
    let before = FormState::default();
    let after = reduce(&before, Action::Submit, policies);
    assert_eq!(before, FormState::default());
    assert_ne!(before, after);
}

// =============================================================
// Submit
// =============================================================

#[test]
fn submit_sets_pending_marker_and_tags_sequence() {
    let state = submitted("", Policies::default());
    assert_eq!(state.response_text, PENDING_MARKER);
    assert_eq!(state.phase, Phase::Pending);
    assert_eq!(state.issued, 1);
    assert_eq!(state.in_flight, 1);
}

#[test]
fn submit_overwrites_previous_answer() {
    let policies = Policies::default();
    let state = submitted("q", policies);
    let state = reduce(&state, Action::Settle { seq: 1, settlement: answer("old") }, policies);
    let state = reduce(&state, Action::Submit, policies);
    assert_eq!(state.response_text, PENDING_MARKER);
    assert_eq!(state.issued, 2);
}

// =============================================================
// Settle
// =============================================================

#[test]
fn settle_answer_resolves() {
    let policies = Policies::default();
    let state = submitted("q", policies);
    let state = reduce(&state, Action::Settle { seq: 1, settlement: answer("42") }, policies);
    assert_eq!(state.response_text, "42");
    assert_eq!(state.phase, Phase::Resolved);
    assert_eq!(state.in_flight, 0);
}

#[test]
fn settle_failure_keeps_pending_marker_by_default() {
    let policies = Policies::default();
    let state = submitted("q", policies);
    let state = reduce(&state, Action::Settle { seq: 1, settlement: failure("status 500") }, policies);
    assert_eq!(state.response_text, PENDING_MARKER);
    assert_eq!(state.phase, Phase::Failed("status 500".into()));
    assert_eq!(state.in_flight, 0);
}

#[test]
fn settle_failure_shows_error_when_configured() {
    let policies = Policies { failure: FailurePolicy::ShowError, ..Policies::default() };
    let state = submitted("q", policies);
    let state = reduce(&state, Action::Settle { seq: 1, settlement: failure("offline") }, policies);
    assert_eq!(state.response_text, "Error: offline");
    assert_eq!(state.phase, Phase::Failed("offline".into()));
}

#[test]
fn latest_issued_drops_stale_settlement() {
    let policies = Policies::default();
    let state = submitted("q", policies);
    let state = reduce(&state, Action::Submit, policies);
    let state = reduce(&state, Action::Settle { seq: 2, settlement: answer("second") }, policies);
    let state = reduce(&state, Action::Settle { seq: 1, settlement: answer("first") }, policies);
    assert_eq!(state.response_text, "second");
    assert_eq!(state.phase, Phase::Resolved);
    assert_eq!(state.in_flight, 0);
}

#[test]
fn latest_issued_stale_failure_does_not_mark_failed() {
    let policies = Policies::default();
    let state = submitted("q", policies);
    let state = reduce(&state, Action::Submit, policies);
    let state = reduce(&state, Action::Settle { seq: 1, settlement: failure("late") }, policies);
    assert_eq!(state.phase, Phase::Pending);
    assert_eq!(state.response_text, PENDING_MARKER);
    assert_eq!(state.in_flight, 1);
}

#[test]
fn last_resolved_lets_late_settlement_win() {
    let policies = Policies { settle: SettlePolicy::LastResolved, ..Policies::default() };
    let state = submitted("q", policies);
    let state = reduce(&state, Action::Submit, policies);
    let state = reduce(&state, Action::Settle { seq: 2, settlement: answer("second") }, policies);
    let state = reduce(&state, Action::Settle { seq: 1, settlement: answer("first") }, policies);
    assert_eq!(state.response_text, "first");
}

#[test]
fn settle_applies_matches_policy() {
    let state = FormState { issued: 3, ..FormState::default() };
    assert!(settle_applies(&state, 3, SettlePolicy::LatestIssued));
    assert!(!settle_applies(&state, 2, SettlePolicy::LatestIssued));
    assert!(settle_applies(&state, 2, SettlePolicy::LastResolved));
}

#[test]
fn in_flight_never_underflows() {
    let policies = Policies::default();
    let state = reduce(&FormState::default(), Action::Settle { seq: 0, settlement: answer("x") }, policies);
    assert_eq!(state.in_flight, 0);
}
