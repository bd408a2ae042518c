//! Provider gateway port
//!
//! Defines the interface for talking to the model providers behind the
//! council identities. Implementations (adapters) live in the
//! infrastructure layer; retries and vendor wire formats belong there, not
//! in the orchestration above this port.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use council_domain::{FailureCategory, ProviderId};

/// Errors a provider call can settle into
///
/// These map one-to-one onto [`FailureCategory`]; the orchestrator records
/// them as outcomes instead of propagating them.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimit(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Unknown(String),
}

impl ProviderError {
    /// The failure classification recorded in a round outcome.
    pub fn category(&self) -> FailureCategory {
        match self {
            ProviderError::Timeout(_) => FailureCategory::Timeout,
            ProviderError::Auth(_) => FailureCategory::Auth,
            ProviderError::RateLimit(_) => FailureCategory::RateLimit,
            ProviderError::MalformedResponse(_) => FailureCategory::MalformedResponse,
            ProviderError::Unknown(_) => FailureCategory::Unknown,
        }
    }
}

/// One generation request to a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// The full user prompt
    pub prompt: String,
    /// System-prompt text carrying the identity's debate stance; empty
    /// means the call goes out without a system prompt
    pub persona: String,
    /// Time bound for the call; an adapter may substitute its own
    /// configured override
    pub timeout: Duration,
}

impl ProviderRequest {
    pub fn new(
        prompt: impl Into<String>,
        persona: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            persona: persona.into(),
            timeout,
        }
    }
}

/// A provider's answer
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub text: String,
    /// Wall-clock time the call took, including any adapter-level retry
    pub latency: Duration,
}

/// Gateway for provider communication
///
/// One call, one answer. The gateway resolves an identity to a concrete
/// configured model and returns either text or a classified error; it never
/// panics on provider misbehavior.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    async fn call(
        &self,
        id: ProviderId,
        request: ProviderRequest,
    ) -> Result<ProviderReply, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories_line_up() {
        assert_eq!(
            ProviderError::Timeout(Duration::from_secs(5)).category(),
            FailureCategory::Timeout
        );
        assert_eq!(
            ProviderError::Auth("401".into()).category(),
            FailureCategory::Auth
        );
        assert_eq!(
            ProviderError::RateLimit("429".into()).category(),
            FailureCategory::RateLimit
        );
        assert_eq!(
            ProviderError::MalformedResponse("no text".into()).category(),
            FailureCategory::MalformedResponse
        );
        assert_eq!(
            ProviderError::Unknown("boom".into()).category(),
            FailureCategory::Unknown
        );
    }

    #[test]
    fn test_timeout_display_names_the_bound() {
        let error = ProviderError::Timeout(Duration::from_secs(120));
        assert_eq!(error.to_string(), "timed out after 120s");
    }
}
