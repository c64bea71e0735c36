use super::types::{GenerateContentRequest, GenerateContentResponse};
use super::{ModelError, TextModel};
use crate::config::ModelConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

/// Statuses meaning the key or model is unusable, not a transient hiccup.
fn is_unavailable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    )
}

impl GeminiClient {
    pub fn new(api_key: String, config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build model HTTP client")?;
        Ok(Self {
            client,
            api_key,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    /// Pre-flight check: verify the key works and the model exists before any pipeline work.
    pub async fn preflight_check(&self) -> Result<(), ModelError> {
        if self.api_key.is_empty() {
            return Err(ModelError::Unavailable("no API key configured".to_string()));
        }

        let resp = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ModelError::Unavailable(format!("model endpoint unreachable: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Unavailable(format!(
                "model {} preflight failed ({}): {}",
                self.model, status, body
            )));
        }

        tracing::debug!(model = %self.model, "model preflight ok");
        Ok(())
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}:generateContent", self.model_url());
        let body = GenerateContentRequest::user_text(prompt, self.temperature);

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .context("generateContent request failed")
            .map_err(ModelError::Request)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = format!("generateContent {} ({}): {}", self.model, status, body);
            if is_unavailable_status(status) {
                return Err(ModelError::Unavailable(message));
            }
            return Err(ModelError::Request(anyhow::anyhow!(message)));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .context("failed to parse generateContent response")
            .map_err(ModelError::Request)?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(ModelError::EmptyReply);
        }
        Ok(text)
    }
}
