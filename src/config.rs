//! Form configuration.
//!
//! The backend base URL is the only value the form needs from the outside
//! world. Policy switches and the optional request timeout ride along with
//! it so the binary can build everything from one place.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::str::FromStr;
use std::time::Duration;

use crate::state::{FailurePolicy, Policies, SettlePolicy};

pub const API_HOST_ENV: &str = "QUERYFORM_API_HOST";
pub const DEFAULT_API_HOST: &str = "http://127.0.0.1:5000";

/// Errors from parsing configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown settle policy '{0}' (expected 'latest-issued' or 'last-resolved')")]
    SettlePolicy(String),

    #[error("unknown failure policy '{0}' (expected 'keep-pending' or 'show-error')")]
    FailurePolicy(String),

    #[error("backend base URL must start with http:// or https://: {0}")]
    InvalidApiHost(String),
}

/// Everything the form controller needs besides a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// Backend base URL, without the `/process_form` suffix.
    pub api_host: String,
    pub policies: Policies,
    /// `None` means a call may stay pending forever.
    pub request_timeout: Option<Duration>,
}

impl FormConfig {
    /// Config with default policies and no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiHost`] if `api_host` is not an HTTP(S) URL.
    pub fn new(api_host: impl Into<String>) -> Result<Self, ConfigError> {
        let api_host = api_host.into();
        if !(api_host.starts_with("http://") || api_host.starts_with("https://")) {
            return Err(ConfigError::InvalidApiHost(api_host));
        }
        Ok(Self { api_host, policies: Policies::default(), request_timeout: None })
    }

    #[must_use]
    pub fn with_policies(mut self, policies: Policies) -> Self {
        self.policies = policies;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl FromStr for SettlePolicy {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "latest-issued" => Ok(Self::LatestIssued),
            "last-resolved" => Ok(Self::LastResolved),
            other => Err(ConfigError::SettlePolicy(other.to_owned())),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "keep-pending" => Ok(Self::KeepPending),
            "show-error" => Ok(Self::ShowError),
            other => Err(ConfigError::FailurePolicy(other.to_owned())),
        }
    }
}
