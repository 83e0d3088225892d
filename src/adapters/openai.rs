//! Chat-completion client for OpenAI-compatible endpoints.

use crate::domain::model::LlmSettings;
use crate::utils::error::{CatalystError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Newer models take this instead of `max_tokens`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            max_completion_tokens: None,
            temperature: None,
        }
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn max_completion_tokens(mut self, tokens: u32) -> Self {
        self.max_completion_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl ChatClient {
    pub fn new(settings: &LlmSettings, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_retries: settings.max_retries,
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_settings(settings: &LlmSettings) -> Result<Option<Self>> {
        match settings.api_key() {
            Some(key) => Ok(Some(Self::new(settings, key)?)),
            None => {
                tracing::info!("No LLM API key configured, AI providers are disabled");
                Ok(None)
            }
        }
    }

    /// Sends a chat completion and returns the first choice's text, which may
    /// be empty.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut attempt = 0;

        loop {
            tracing::debug!("Calling {} with model {} (attempt {})", url, request.model, attempt + 1);
            let sent = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await;

            match sent {
                Ok(response)
                    if response.status() == StatusCode::TOO_MANY_REQUESTS
                        && attempt < self.max_retries =>
                {
                    let wait = self.retry_delay * (attempt + 1);
                    tracing::warn!("⏳ Rate limited by LLM provider, retrying in {:?}", wait);
                    tokio::time::sleep(wait).await;
                }
                Ok(response) if !response.status().is_success() => {
                    let status = response.status().as_u16();
                    let message = response.text().await.unwrap_or_default();
                    tracing::error!("LLM request failed with status {}: {}", status, message);
                    return Err(CatalystError::UpstreamError { status, message });
                }
                Ok(response) => {
                    let body: ChatResponse = response.json().await?;
                    return Ok(body
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.message.content)
                        .unwrap_or_default());
                }
                Err(err) if attempt < self.max_retries => {
                    let wait = self.retry_delay / 2;
                    tracing::warn!("LLM request failed ({}), retrying in {:?}", err, wait);
                    tokio::time::sleep(wait).await;
                }
                Err(err) => return Err(err.into()),
            }
            attempt += 1;
        }
    }
}
