//! Anthropic Messages API adapter

use super::{ProviderAdapter, ProviderSettings, status_to_error, transport_error};
use async_trait::async_trait;
use council_application::{ProviderError, ProviderReply, ProviderRequest};
use council_domain::ProviderId;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl AnthropicAdapter {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Claude
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderReply, ProviderError> {
        let url = format!("{}/v1/messages", self.settings.base_url);

        let mut payload = json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "messages": [{"role": "user", "content": request.prompt}],
        });
        if !request.persona.is_empty() {
            payload["system"] = json!(request.persona);
        }

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", API_VERSION)
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
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Extract the text blocks from a Messages API response body
fn parse_response(body: &str) -> Result<String, ProviderError> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let text = parsed
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        return Err(ProviderError::MalformedResponse(
            "no text content in reply".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_blocks() {
        let body = r#"{
            "id": "msg_01",
            "content": [
                {"type": "text", "text": "First paragraph."},
                {"type": "tool_use", "id": "tu_1", "name": "noop", "input": {}},
                {"type": "text", "text": "Second paragraph."}
            ],
            "stop_reason": "end_turn"
        }"#;
        let text = parse_response(body).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_response("not json").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_rejects_empty_content() {
        let err = parse_response(r#"{"content": []}"#).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }
}
