use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{ChatRequest, ChatResponse, TextProvider};
use crate::ai::{truncate_chars, GenerationRequest};
use crate::config::AiConfig;
use crate::{Error, Result};

const API_URL: &str = "https://api.deepseek.com/v1/chat/completions";

/// DeepSeek chat-completions provider
pub struct DeepseekProvider {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl DeepseekProvider {
    pub fn new(api_key: &str, config: &AiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to build DeepSeek HTTP client");

        Self {
            client,
            api_key: api_key.to_string(),
            model: config.deepseek_model.clone(),
            temperature: config.temperature,
            max_tokens: config.deepseek_max_tokens,
        }
    }
}

#[async_trait::async_trait]
impl TextProvider for DeepseekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatRequest::new(&self.model, self.temperature, self.max_tokens, request);

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::AiProvider(format!("DeepSeek API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::AiProvider(format!(
                "DeepSeek API returned {}: {}",
                status,
                truncate_chars(&detail, 200)
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::AiProvider(format!("Failed to parse DeepSeek response: {}", e)))?;

        if let Some(error) = chat.error {
            return Err(Error::AiProvider(format!("DeepSeek API error: {}", error.message)));
        }

        let text = chat.into_text();
        if text.trim().is_empty() {
            return Err(Error::AiProvider("DeepSeek returned an empty completion".to_string()));
        }

        debug!("DeepSeek raw response: {}...", truncate_chars(&text, 100));
        Ok(text)
    }
}
