mod deepseek;
mod openai;

pub use deepseek::DeepseekProvider;
pub use openai::OpenAiProvider;

use serde::{Deserialize, Serialize};

use crate::ai::GenerationRequest;
use crate::Result;

/// Trait for chat-completion text providers
#[async_trait::async_trait]
pub trait TextProvider: Send + Sync {
    /// Short name used in logs and failure reasons
    fn name(&self) -> &str;

    /// Send the prompt pair and return the model's raw output text
    async fn complete(&self, request: &GenerationRequest) -> Result<String>;
}

// Both providers speak the OpenAI chat-completions wire format.

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatRequest {
    fn new(model: &str, temperature: f32, max_tokens: u32, request: &GenerationRequest) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user_prompt.clone(),
                },
            ],
            temperature,
            max_tokens,
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl ChatResponse {
    /// Extract the first choice's text, treating a missing or blank
    /// completion as an empty string.
    fn into_text(self) -> String {
        self.choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}
