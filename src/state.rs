//! Form state snapshot and its reducer.
//!
//! DESIGN
//! ======
//! The form holds exactly two user-visible values, the current query and the
//! response text. They live in one immutable `FormState` snapshot that only
//! changes through [`reduce`], a pure function of the previous snapshot, an
//! [`Action`] and the active [`Policies`]. Keeping transitions pure makes the
//! ordering of overlapping submissions observable in tests instead of hiding
//! it inside ad-hoc mutation.
//!
//! Every submission is tagged with a sequence number taken from `issued`.
//! Whether a settling submission may still write the response text is decided
//! by [`settle_applies`].

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

/// Placeholder shown while a submission is in flight.
pub const PENDING_MARKER: &str = "Thinking...";

// =============================================================================
// POLICIES
// =============================================================================

/// Which settled submissions are allowed to write the response text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Only the most recently issued submission may write; older results are
    /// dropped when they settle.
    #[default]
    LatestIssued,
    /// Every settlement writes, so whichever call resolves last wins.
    LastResolved,
}

/// What a failed submission does to the response text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Leave the response text as it is (normally the pending marker).
    #[default]
    KeepPending,
    /// Replace the response text with an error line.
    ShowError,
}

/// Policy pair consulted by the reducer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Policies {
    pub settle: SettlePolicy,
    pub failure: FailurePolicy,
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Lifecycle of the most recent applied transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A submission was issued and nothing has been applied since.
    Pending,
    /// An answer was applied to the response text.
    Resolved,
    /// A failure was applied; carries the reason.
    Failed(String),
}

/// Immutable snapshot of the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    /// Current input value. The rendered input always shows this.
    pub query: String,
    /// Status or answer text shown below the form.
    pub response_text: String,
    pub phase: Phase,
    /// Sequence number of the most recently issued submission (0 = none).
    pub issued: u64,
    /// Submissions issued but not yet settled.
    pub in_flight: usize,
}

/// Result of one submission as seen by the reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    Answer(String),
    TransportFailure(String),
}

/// State transitions accepted by [`reduce`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Replace the query unconditionally.
    SetQuery(String),
    /// Issue a new submission for the current query.
    Submit,
    /// A previously issued submission finished.
    Settle { seq: u64, settlement: Settlement },
}

// =============================================================================
// REDUCER
// =============================================================================

/// Return `true` when a submission tagged `seq` may write its result into
/// `state` under `policy`.
#[must_use]
pub fn settle_applies(state: &FormState, seq: u64, policy: SettlePolicy) -> bool {
    match policy {
        SettlePolicy::LatestIssued => seq == state.issued,
        SettlePolicy::LastResolved => true,
    }
}

/// Compute the next snapshot.
#[must_use]
pub fn reduce(state: &FormState, action: Action, policies: Policies) -> FormState {
    let mut next = state.clone();
    match action {
        Action::SetQuery(query) => {
            next.query = query;
        }
        Action::Submit => {
            next.issued = state.issued.saturating_add(1);
            next.in_flight = state.in_flight.saturating_add(1);
            next.response_text = PENDING_MARKER.to_owned();
            next.phase = Phase::Pending;
        }
        Action::Settle { seq, settlement } => {
            next.in_flight = state.in_flight.saturating_sub(1);
            if !settle_applies(state, seq, policies.settle) {
                return next;
            }
            match settlement {
                Settlement::Answer(text) => {
                    next.response_text = text;
                    next.phase = Phase::Resolved;
                }
                Settlement::TransportFailure(reason) => {
                    if policies.failure == FailurePolicy::ShowError {
                        next.response_text = format!("Error: {reason}");
                    }
                    next.phase = Phase::Failed(reason);
                }
            }
        }
    }
    next
}
