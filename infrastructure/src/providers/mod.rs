//! Provider adapters for the model HTTP APIs
//!
//! Each adapter speaks one vendor wire format and makes exactly one HTTP
//! attempt per call. Time bounds and the retry policy live in
//! [`ProviderRegistry`], so every adapter stays a thin request/response
//! translation.

pub mod anthropic;
pub mod gemini;
pub mod openai_compat;
pub mod registry;

use async_trait::async_trait;
use council_application::{ProviderError, ProviderReply, ProviderRequest};
use council_domain::ProviderId;
use reqwest::StatusCode;
use std::time::Duration;

pub use registry::ProviderRegistry;

/// Connection settings for one adapter, resolved from config and env
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Model name sent on the wire
    pub model: String,
    /// API key read from the configured environment variable
    pub api_key: String,
    /// Endpoint base, no trailing slash
    pub base_url: String,
    /// Completion token cap
    pub max_tokens: u32,
    /// Per-provider timeout override
    pub timeout_override: Option<Duration>,
}

/// One vendor wire format
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Model name this adapter was configured with
    fn model(&self) -> &str;

    /// Make one HTTP attempt. No time bound is applied here; the
    /// registry wraps the call.
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderReply, ProviderError>;
}

/// Read an API key from the environment, treating blank values as unset
pub fn read_credential(env_key: &str) -> Option<String> {
    if env_key.is_empty() {
        return None;
    }
    std::env::var(env_key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Classify a non-success HTTP status into a provider error
pub(crate) fn status_to_error(status: StatusCode, body: &str) -> ProviderError {
    let detail = format!("HTTP {}: {}", status.as_u16(), snippet(body));
    match status.as_u16() {
        401 | 403 => ProviderError::Auth(detail),
        429 => ProviderError::RateLimit(detail),
        _ => ProviderError::Unknown(detail),
    }
}

/// Classify a transport-level failure
pub(crate) fn transport_error(error: reqwest::Error) -> ProviderError {
    ProviderError::Unknown(format!("transport error: {error}"))
}

/// First part of an error body, enough to diagnose without logging a novel
fn snippet(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= LIMIT {
        trimmed.to_string()
    } else {
        let mut end = LIMIT;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}
