//! Google Gemini captioning provider
//!
//! Fetches the image, inlines it as base64 and asks a multimodal model for a description.

pub mod captioner;
pub mod types;

pub use captioner::GeminiCaptioner;

use crate::config::{GeminiSettings, require_key};
use crate::retry::RetryPolicy;

/// Gemini configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// Model name for captioning
    pub model: String,
    /// Base URL for API requests
    pub base_url: String,
    /// Instruction sent with every image
    pub caption_prompt: String,
    pub temperature: f32,
}

impl GeminiConfig {
    pub fn from_settings(settings: &GeminiSettings) -> Self {
        Self {
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            caption_prompt: settings.caption_prompt.clone(),
            temperature: settings.temperature,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::from_settings(&GeminiSettings::default())
    }
}

/// Builder for GeminiCaptioner
pub struct GeminiBuilder {
    api_key: Option<String>,
    config: GeminiConfig,
    retry: RetryPolicy,
}

impl GeminiBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            api_key: None,
            config: GeminiConfig::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set custom configuration
    pub fn with_config(mut self, config: GeminiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build the captioner
    pub fn build(self) -> crate::Result<GeminiCaptioner> {
        let api_key = require_key(&self.api_key, "gemini", "GOOGLE_API_KEY")?;
        Ok(GeminiCaptioner::new(api_key, self.config, self.retry))
    }
}

impl Default for GeminiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
