//! Per-call outcome values
//!
//! A provider call inside a round never raises; it settles into a
//! [`ResponseOutcome`] that the round records either way. Only the
//! structural errors in [`crate::core::error::DebateError`] abort a debate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Why a provider call produced no usable text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// The call did not finish within its time bound
    Timeout,
    /// The provider rejected the credentials
    Auth,
    /// The provider throttled the call
    RateLimit,
    /// The provider answered with something that could not be read as text
    MalformedResponse,
    /// Anything else (network faults, server errors, task panics)
    Unknown,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Timeout => "timeout",
            FailureCategory::Auth => "auth",
            FailureCategory::RateLimit => "rate_limit",
            FailureCategory::MalformedResponse => "malformed_response",
            FailureCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one provider call within a round (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseOutcome {
    /// The provider answered with text
    Success { text: String, latency: Duration },
    /// The provider did not answer; the category says why
    Failure {
        category: FailureCategory,
        detail: String,
    },
}

impl ResponseOutcome {
    /// Creates a successful outcome from a provider's answer.
    pub fn success(text: impl Into<String>, latency: Duration) -> Self {
        ResponseOutcome::Success {
            text: text.into(),
            latency,
        }
    }

    /// Creates a failed outcome with a category and a human-readable detail.
    pub fn failure(category: FailureCategory, detail: impl Into<String>) -> Self {
        ResponseOutcome::Failure {
            category,
            detail: detail.into(),
        }
    }

    /// Returns `true` if the call produced text.
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseOutcome::Success { .. })
    }

    /// The answer text, if the call succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            ResponseOutcome::Success { text, .. } => Some(text),
            ResponseOutcome::Failure { .. } => None,
        }
    }

    /// Wall-clock latency of a successful call.
    pub fn latency(&self) -> Option<Duration> {
        match self {
            ResponseOutcome::Success { latency, .. } => Some(*latency),
            ResponseOutcome::Failure { .. } => None,
        }
    }

    /// Failure classification, if the call failed.
    pub fn failure_category(&self) -> Option<FailureCategory> {
        match self {
            ResponseOutcome::Success { .. } => None,
            ResponseOutcome::Failure { category, .. } => Some(*category),
        }
    }

    /// Failure detail, if the call failed.
    pub fn failure_detail(&self) -> Option<&str> {
        match self {
            ResponseOutcome::Success { .. } => None,
            ResponseOutcome::Failure { detail, .. } => Some(detail),
        }
    }
}
