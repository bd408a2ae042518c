//! Provider health check use case
//!
//! Probes each identity with a one-word prompt before a debate so dead
//! credentials surface in seconds instead of one timeout into round one.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use council_domain::ProviderId;

use crate::ports::provider::{ProviderError, ProviderGateway, ProviderRequest};

/// Probe prompt; costs almost nothing in tokens.
pub const PING_PROMPT: &str = "Reply with the word OK only.";

/// Probes get a short bound of their own; a provider that cannot answer a
/// one-word prompt in this window is down for practical purposes.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Result of probing one provider
#[derive(Debug)]
pub struct ProbeResult {
    pub id: ProviderId,
    /// Latency on success, classified error otherwise
    pub outcome: Result<Duration, ProviderError>,
}

impl ProbeResult {
    pub fn is_healthy(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Identities that answered their probe, in probe order.
pub fn healthy_ids(results: &[ProbeResult]) -> Vec<ProviderId> {
    results
        .iter()
        .filter(|r| r.is_healthy())
        .map(|r| r.id)
        .collect()
}

/// Use case for verifying providers can answer before a debate begins
pub struct HealthCheckUseCase<G: ProviderGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: ProviderGateway + 'static> HealthCheckUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Probe every given identity concurrently. Results keep the input
    /// order regardless of which probe settles first.
    pub async fn execute(&self, ids: &[ProviderId]) -> Vec<ProbeResult> {
        let probes = ids.iter().map(|id| {
            let gateway = Arc::clone(&self.gateway);
            let id = *id;
            async move {
                let request = ProviderRequest::new(PING_PROMPT, "", PROBE_TIMEOUT);
                let outcome = gateway.call(id, request).await.map(|reply| reply.latency);
                match &outcome {
                    Ok(latency) => info!("{} healthy ({:.1}s)", id, latency.as_secs_f64()),
                    Err(e) => warn!("{} unhealthy: {}", id, e),
                }
                ProbeResult { id, outcome }
            }
        });
        join_all(probes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider::ProviderReply;
    use async_trait::async_trait;

    struct FlakyGateway;

    #[async_trait]
    impl ProviderGateway for FlakyGateway {
        async fn call(
            &self,
            id: ProviderId,
            request: ProviderRequest,
        ) -> Result<ProviderReply, ProviderError> {
            assert_eq!(request.prompt, PING_PROMPT);
            assert_eq!(request.timeout, PROBE_TIMEOUT);
            match id {
                ProviderId::Grok => Err(ProviderError::Auth("401".into())),
                _ => Ok(ProviderReply {
                    text: "OK".into(),
                    latency: Duration::from_millis(300),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_probe_results_keep_input_order() {
        let use_case = HealthCheckUseCase::new(Arc::new(FlakyGateway));
        let ids = [ProviderId::Claude, ProviderId::Grok, ProviderId::Gemini];

        let results = use_case.execute(&ids).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, ProviderId::Claude);
        assert_eq!(results[1].id, ProviderId::Grok);
        assert_eq!(results[2].id, ProviderId::Gemini);
        assert!(results[0].is_healthy());
        assert!(!results[1].is_healthy());
        assert_eq!(
            healthy_ids(&results),
            vec![ProviderId::Claude, ProviderId::Gemini]
        );
    }

    #[tokio::test]
    async fn test_probing_nothing_is_fine() {
        let use_case = HealthCheckUseCase::new(Arc::new(FlakyGateway));
        let results = use_case.execute(&[]).await;
        assert!(results.is_empty());
    }
}
