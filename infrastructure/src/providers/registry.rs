//! Adapter registry implementing the application gateway port
//!
//! The registry owns one adapter per credentialed identity and applies
//! the call policy: a per-call time bound, plus one retry with a
//! stretched bound when a call times out and retry is enabled.

use super::anthropic::{self, AnthropicAdapter};
use super::gemini::{self, GeminiAdapter};
use super::openai_compat::{self, OpenAiCompatAdapter};
use super::{ProviderAdapter, ProviderSettings, read_credential};
use crate::config::FileConfig;
use async_trait::async_trait;
use council_application::{ProviderError, ProviderGateway, ProviderReply, ProviderRequest};
use council_domain::ProviderId;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const RETRY_STRETCH: f32 = 1.5;

struct ProviderHandle {
    adapter: Arc<dyn ProviderAdapter>,
    timeout_override: Option<Duration>,
}

pub struct ProviderRegistry {
    adapters: BTreeMap<ProviderId, ProviderHandle>,
    retry_on_timeout: bool,
}

impl ProviderRegistry {
    /// Build one adapter per identity whose credential variable is set.
    ///
    /// Identities without credentials get no adapter; the catalog marks
    /// them unavailable through the same credential check.
    pub fn from_config(config: &FileConfig) -> Self {
        let client = reqwest::Client::new();
        let mut adapters = BTreeMap::new();

        for id in ProviderId::ALL {
            let provider = config.providers.get(id);
            let Some(api_key) = read_credential(&provider.api_key_env) else {
                debug!(
                    "No credentials for {} ({} unset), skipping adapter",
                    id, provider.api_key_env
                );
                continue;
            };

            let base_url = provider.base_url.clone().unwrap_or_else(|| match id {
                ProviderId::Claude => anthropic::DEFAULT_BASE_URL.to_string(),
                ProviderId::Gemini => gemini::DEFAULT_BASE_URL.to_string(),
                other => openai_compat::default_base_url(other).to_string(),
            });
            let settings = ProviderSettings {
                model: provider.model.clone(),
                api_key,
                base_url,
                max_tokens: provider.max_tokens.unwrap_or(config.defaults.max_tokens),
                timeout_override: provider.timeout_secs.map(Duration::from_secs),
            };
            let timeout_override = settings.timeout_override;

            let adapter: Arc<dyn ProviderAdapter> = match id {
                ProviderId::Claude => Arc::new(AnthropicAdapter::new(client.clone(), settings)),
                ProviderId::Gemini => Arc::new(GeminiAdapter::new(client.clone(), settings)),
                other => Arc::new(OpenAiCompatAdapter::new(other, client.clone(), settings)),
            };
            adapters.insert(
                id,
                ProviderHandle {
                    adapter,
                    timeout_override,
                },
            );
        }

        Self {
            adapters,
            retry_on_timeout: config.defaults.retry_on_timeout,
        }
    }

    /// Identities that have a working adapter, in roster order
    pub fn configured_ids(&self) -> Vec<ProviderId> {
        self.adapters.keys().copied().collect()
    }

    pub fn is_configured(&self, id: ProviderId) -> bool {
        self.adapters.contains_key(&id)
    }

    /// Configured model name for an identity
    pub fn model_of(&self, id: ProviderId) -> Option<&str> {
        self.adapters.get(&id).map(|handle| handle.adapter.model())
    }
}

#[async_trait]
impl ProviderGateway for ProviderRegistry {
    async fn call(
        &self,
        id: ProviderId,
        request: ProviderRequest,
    ) -> Result<ProviderReply, ProviderError> {
        let Some(handle) = self.adapters.get(&id) else {
            return Err(ProviderError::Unknown(format!(
                "no adapter configured for '{id}'"
            )));
        };

        let bound = handle.timeout_override.unwrap_or(request.timeout);
        let started = Instant::now();
        let reply =
            call_with_retry(handle.adapter.as_ref(), bound, self.retry_on_timeout, &request)
                .await?;

        // Report wall time across both attempts, not just the winning one
        Ok(ProviderReply {
            text: reply.text,
            latency: started.elapsed(),
        })
    }
}

async fn call_with_retry(
    adapter: &dyn ProviderAdapter,
    bound: Duration,
    retry_on_timeout: bool,
    request: &ProviderRequest,
) -> Result<ProviderReply, ProviderError> {
    match bounded(bound, adapter.generate(request)).await {
        Err(ProviderError::Timeout(_)) if retry_on_timeout => {
            let stretched = bound.mul_f32(RETRY_STRETCH);
            warn!(
                "{} timed out after {:?}, retrying once with {:?}",
                adapter.id(),
                bound,
                stretched
            );
            bounded(stretched, adapter.generate(request)).await
        }
        outcome => outcome,
    }
}

async fn bounded<F>(bound: Duration, attempt: F) -> Result<ProviderReply, ProviderError>
where
    F: Future<Output = Result<ProviderReply, ProviderError>>,
{
    match tokio::time::timeout(bound, attempt).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProviderError::Timeout(bound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedAdapter {
        delays: Mutex<VecDeque<Duration>>,
        reply: Result<String, ProviderError>,
        attempts: AtomicUsize,
    }

    impl ScriptedAdapter {
        fn new(delays: Vec<Duration>, reply: Result<String, ProviderError>) -> Self {
            Self {
                delays: Mutex::new(delays.into()),
                reply,
                attempts: AtomicUsize::new(0),
            }
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for ScriptedAdapter {
        fn id(&self) -> ProviderId {
            ProviderId::Grok
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        async fn generate(
            &self,
            _request: &ProviderRequest,
        ) -> Result<ProviderReply, ProviderError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let delay = self
                .delays
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Duration::ZERO);
            tokio::time::sleep(delay).await;
            self.reply.clone().map(|text| ProviderReply {
                text,
                latency: delay,
            })
        }
    }

    fn request() -> ProviderRequest {
        ProviderRequest::new("ping", "", Duration::from_secs(60))
    }

    fn keyless_config() -> FileConfig {
        let mut config = FileConfig::default();
        config.providers.gemini.api_key_env = "AI_COUNCIL_TEST_UNSET_A".to_string();
        config.providers.openai.api_key_env = "AI_COUNCIL_TEST_UNSET_B".to_string();
        config.providers.claude.api_key_env = "AI_COUNCIL_TEST_UNSET_C".to_string();
        config.providers.grok.api_key_env = "AI_COUNCIL_TEST_UNSET_D".to_string();
        config.providers.deepseek.api_key_env = "AI_COUNCIL_TEST_UNSET_E".to_string();
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_classified_error() {
        let adapter = ScriptedAdapter::new(
            vec![Duration::from_secs(600)],
            Ok("too late".to_string()),
        );
        let result =
            call_with_retry(&adapter, Duration::from_secs(1), false, &request()).await;
        assert!(
            matches!(result, Err(ProviderError::Timeout(bound)) if bound == Duration::from_secs(1))
        );
        assert_eq!(adapter.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_uses_stretched_bound() {
        // First attempt blows the 60s bound; the second takes 80s, inside
        // the stretched 90s bound but outside the original one.
        let adapter = ScriptedAdapter::new(
            vec![Duration::from_secs(600), Duration::from_secs(80)],
            Ok("pong".to_string()),
        );
        let result = call_with_retry(&adapter, Duration::from_secs(60), true, &request()).await;
        assert_eq!(result.unwrap().text, "pong");
        assert_eq!(adapter.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_timeout_is_final() {
        let adapter = ScriptedAdapter::new(
            vec![Duration::from_secs(600), Duration::from_secs(600)],
            Ok("never".to_string()),
        );
        let result = call_with_retry(&adapter, Duration::from_secs(60), true, &request()).await;
        assert!(matches!(result, Err(ProviderError::Timeout(_))));
        assert_eq!(adapter.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_timeout_errors_are_not_retried() {
        let adapter = ScriptedAdapter::new(
            vec![],
            Err(ProviderError::Auth("bad key".to_string())),
        );
        let result = call_with_retry(&adapter, Duration::from_secs(60), true, &request()).await;
        assert!(matches!(result, Err(ProviderError::Auth(_))));
        assert_eq!(adapter.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_disabled_gives_up_after_one_attempt() {
        let adapter = ScriptedAdapter::new(
            vec![Duration::from_secs(600), Duration::ZERO],
            Ok("pong".to_string()),
        );
        let result = call_with_retry(&adapter, Duration::from_secs(60), false, &request()).await;
        assert!(matches!(result, Err(ProviderError::Timeout(_))));
        assert_eq!(adapter.attempts(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_identity_is_reported() {
        let registry = ProviderRegistry::from_config(&keyless_config());
        assert!(registry.configured_ids().is_empty());
        assert!(!registry.is_configured(ProviderId::Claude));

        let err = registry
            .call(ProviderId::Claude, request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no adapter configured"));
    }
}
