//! Application layer for ai-council
//!
//! This crate contains the debate use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    progress::{NoProgress, ProgressNotifier},
    provider::{ProviderError, ProviderGateway, ProviderReply, ProviderRequest},
};
pub use use_cases::health_check::{
    HealthCheckUseCase, PING_PROMPT, PROBE_TIMEOUT, ProbeResult, healthy_ids,
};
pub use use_cases::run_debate::{RunDebateError, RunDebateInput, RunDebateUseCase};
