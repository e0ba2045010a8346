use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{LlmClient, LlmSettings};
use crate::prompt::{AuditPrompt, AUDIT_TEMPERATURE};

const DEFAULT_MODEL: &str = "gpt-4o";

/// Chat-completions client for the OpenAI API (or any endpoint that
/// speaks the same protocol).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            bail!(
                "OpenAI API key must be provided via {}",
                LlmSettings::API_KEY_ENV
            );
        }
        let base = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let url = format!("{}/v1/chat/completions", base.trim_end_matches('/'));
        let http = Client::builder()
            .user_agent("a11y-lens/0.3")
            .timeout(Duration::from_secs(settings.timeout_secs.unwrap_or(60)))
            .build()
            .context("failed to build OpenAI HTTP client")?;
        Ok(Self {
            http,
            url,
            api_key: settings.api_key.clone(),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &AuditPrompt) -> Result<String> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user.clone(),
                },
            ],
            temperature: AUDIT_TEMPERATURE,
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("failed to call OpenAI chat completions API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("OpenAI API error ({}): {}", status, body);
        }

        let chat: ChatCompletionResponse = response
            .json()
            .await
            .context("failed to parse OpenAI response")?;
        chat.choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| anyhow!("OpenAI response missing message content"))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::build_audit_prompt;
    use crate::scanner::{WcagLevel, WcagVersion};
    use httpmock::prelude::*;

    fn base_settings(url: String) -> LlmSettings {
        LlmSettings {
            provider: "openai".into(),
            api_key: "test-key".into(),
            endpoint: Some(url),
            model: Some("gpt-test".into()),
            timeout_secs: Some(5),
        }
    }

    fn sample_prompt() -> crate::prompt::AuditPrompt {
        build_audit_prompt("index.html", "<p>hi</p>", WcagLevel::AA, WcagVersion::V2_1)
    }

    #[test]
    fn rejects_blank_api_key() {
        let mut settings = base_settings("http://localhost".into());
        settings.api_key = "  ".into();
        assert!(OpenAiClient::new(&settings).is_err());
    }

    #[test]
    fn defaults_model_when_unset() {
        let mut settings = base_settings("http://localhost".into());
        settings.model = None;
        let client = OpenAiClient::new(&settings).unwrap();
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[tokio::test]
    #[ignore = "requires loopback networking"]
    async fn complete_returns_raw_content() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"choices":[{"message":{"content":"```json\n[]\n```"}}]}"#);
        });

        let client = OpenAiClient::new(&base_settings(server.base_url())).unwrap();
        let raw = client.complete(&sample_prompt()).await.unwrap();
        assert_eq!(raw, "```json\n[]\n```");
        mock.assert();
    }

    #[tokio::test]
    #[ignore = "requires loopback networking"]
    async fn surfaces_api_errors_without_retrying() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500).body("boom");
        });

        let client = OpenAiClient::new(&base_settings(server.base_url())).unwrap();
        let err = client.complete(&sample_prompt()).await.unwrap_err();
        assert!(err.to_string().contains("OpenAI API error"));
        mock.assert_hits(1);
    }
}
