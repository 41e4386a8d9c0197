//! Form controller — binds input to state and orchestrates submissions.
//!
//! DESIGN
//! ======
//! The controller owns a `watch` channel holding the current [`FormState`].
//! All writes go through [`reduce`], so every published value is a complete
//! snapshot and renderers never observe a half-applied transition.
//!
//! `submit` is a plain function that returns a future. The pending marker and
//! the query payload are captured before it returns, so the marker is visible
//! before the transport call is even issued and later edits to the query do
//! not leak into an in-flight request. The returned future is `'static` and
//! can be spawned; nothing stops a second submission while the first is still
//! pending.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures come back as a tagged result. They are logged here and
//! handed to the reducer, which applies the configured failure policy.
//! Nothing propagates to the rendering path as an error.

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::FormConfig;
use crate::state::{Action, FormState, Policies, Settlement, reduce, settle_applies};
use crate::transport::{QueryPayload, QueryTransport, TransportError};

/// What happened to one submission once it settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Sequence number assigned at submission time.
    pub seq: u64,
    /// `false` when the settle policy dropped the result as stale.
    pub applied: bool,
    pub outcome: Result<String, TransportError>,
}

/// Cloneable handle to the form.
#[derive(Clone)]
pub struct FormController {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<FormState>,
    transport: Arc<dyn QueryTransport>,
    api_host: String,
    policies: Policies,
}

impl FormController {
    #[must_use]
    pub fn new(transport: Arc<dyn QueryTransport>, config: &FormConfig) -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self {
            inner: Arc::new(Inner {
                state,
                transport,
                api_host: config.api_host.clone(),
                policies: config.policies,
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> FormState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.inner.state.subscribe()
    }

    /// Replace the query. No validation.
    pub fn set_query(&self, text: impl Into<String>) {
        self.dispatch(Action::SetQuery(text.into()));
    }

    /// Start a submission for the current query.
    ///
    /// The pending marker is published before this returns. Awaiting the
    /// returned future performs the transport call and applies its result.
    pub fn submit(&self) -> impl Future<Output = SubmitReport> + Send + use<> {
        let pending = self.dispatch(Action::Submit);
        let seq = pending.issued;
        let payload = QueryPayload::new(pending.query);
        let controller = self.clone();

        async move {
            let outcome = controller
                .inner
                .transport
                .send(&controller.inner.api_host, &payload)
                .await;

            let settlement = match &outcome {
                Ok(answer) => Settlement::Answer(answer.clone()),
                Err(error) => {
                    tracing::warn!(seq, error = %error, "query submission failed");
                    Settlement::TransportFailure(error.to_string())
                }
            };

            let applied = controller.settle(seq, settlement);
            if !applied {
                tracing::debug!(seq, "dropped stale submission result");
            }

            SubmitReport { seq, applied, outcome }
        }
    }

    fn settle(&self, seq: u64, settlement: Settlement) -> bool {
        let policies = self.inner.policies;
        let mut applied = false;
        self.inner.state.send_modify(|state| {
            applied = settle_applies(state, seq, policies.settle);
            *state = reduce(state, Action::Settle { seq, settlement }, policies);
        });
        applied
    }

    fn dispatch(&self, action: Action) -> FormState {
        let policies = self.inner.policies;
        let mut after = FormState::default();
        self.inner.state.send_modify(|state| {
            *state = reduce(state, action, policies);
            after = state.clone();
        });
        after
    }
}
