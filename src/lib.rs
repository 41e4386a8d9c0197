//! Query form client.
//!
//! A single input form that sends a free-text question to a `/process_form`
//! backend and shows the answer. State lives in [`state`], the outbound call
//! in [`transport`], and [`controller`] ties them together. [`view`] renders
//! snapshots to a terminal and [`session`] runs the terminal loop.

pub mod config;
pub mod controller;
pub mod session;
pub mod state;
pub mod transport;
pub mod view;

pub use config::{ConfigError, FormConfig};
pub use controller::{FormController, SubmitReport};
pub use session::SessionError;
pub use state::{FailurePolicy, FormState, PENDING_MARKER, Phase, Policies, SettlePolicy};
pub use transport::{HttpTransport, QueryPayload, QueryTransport, TransportError};
