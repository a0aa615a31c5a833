//! Groq refiner implementation

use super::{GroqConfig, types::*};
use crate::{
    Error, Result,
    providers::{PromptRefiner, error_from_response},
};
use async_trait::async_trait;
use reqwest::Client;

const PROVIDER: &str = "groq";

pub struct GroqRefiner {
    client: Client,
    api_key: String,
    config: GroqConfig,
}

impl GroqRefiner {
    pub fn new(api_key: String, config: GroqConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
        }
    }

    pub fn builder() -> super::GroqBuilder {
        super::GroqBuilder::new()
    }

    fn chat_request(&self, description: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(self.config.system_prompt.clone()),
                ChatMessage::user(description),
            ],
            temperature: Some(0.7),
            max_tokens: Some(512),
        }
    }
}

#[async_trait]
impl PromptRefiner for GroqRefiner {
    async fn refine(&self, description: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.chat_request(description))
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_from_response(PROVIDER, "Groq API error", response).await);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

        chat.choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| Error::provider(PROVIDER, "Groq returned no choices"))
    }
}
