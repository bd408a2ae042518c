//! Chat Completions adapter for OpenAI-compatible APIs
//!
//! OpenAI, xAI, and DeepSeek all speak the same chat/completions wire
//! format, so one adapter covers the three identities with different
//! endpoints.

use super::{ProviderAdapter, ProviderSettings, status_to_error, transport_error};
use async_trait::async_trait;
use council_application::{ProviderError, ProviderReply, ProviderRequest};
use council_domain::ProviderId;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;

/// Built-in endpoint for an identity served by this adapter
pub fn default_base_url(id: ProviderId) -> &'static str {
    match id {
        ProviderId::OpenAi => "https://api.openai.com/v1",
        ProviderId::Grok => "https://api.x.ai/v1",
        ProviderId::DeepSeek => "https://api.deepseek.com",
        ProviderId::Claude | ProviderId::Gemini => {
            unreachable!("{id} is not served by the chat/completions adapter")
        }
    }
}

pub struct OpenAiCompatAdapter {
    id: ProviderId,
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl OpenAiCompatAdapter {
    pub fn new(id: ProviderId, client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self {
            id,
            client,
            settings,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderReply, ProviderError> {
        let url = format!("{}/chat/completions", self.settings.base_url);

        let mut messages = Vec::new();
        if !request.persona.is_empty() {
            messages.push(json!({"role": "system", "content": request.persona}));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        let payload = json!({
            "model": self.settings.model,
            "messages": messages,
            "max_tokens": self.settings.max_tokens,
        });

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(status_to_error(status, &body));
        }

        let text = parse_response(&body)?;
        Ok(ProviderReply {
            text,
            latency: started.elapsed(),
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// Extract the first choice's message content
fn parse_response(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let text = parsed
        .choices
        .first()
        .and_then(|choice| choice.message.as_ref())
        .map(|message| message.content.clone())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::MalformedResponse(
            "no choice content in reply".to_string(),
        ));
    }
    Ok(text)
}
