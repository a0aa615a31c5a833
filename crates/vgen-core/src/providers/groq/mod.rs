//! Groq prompt refinement provider
//!
//! Uses the OpenAI-compatible chat completions endpoint. Single shot, no retries.

pub mod refiner;
pub mod types;

pub use refiner::GroqRefiner;

use crate::config::{GroqSettings, require_key};

/// Groq configuration
#[derive(Clone, Debug)]
pub struct GroqConfig {
    pub model: String,
    /// Base URL for API requests
    pub base_url: String,
    pub system_prompt: String,
}

impl GroqConfig {
    pub fn from_settings(settings: &GroqSettings) -> Self {
        Self {
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            system_prompt: settings.system_prompt.clone(),
        }
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self::from_settings(&GroqSettings::default())
    }
}

/// Builder for GroqRefiner
pub struct GroqBuilder {
    api_key: Option<String>,
    config: GroqConfig,
}

impl GroqBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            config: GroqConfig::default(),
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

    pub fn with_config(mut self, config: GroqConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> crate::Result<GroqRefiner> {
        let api_key = require_key(&self.api_key, "groq", "GROQ_API_KEY")?;
        Ok(GroqRefiner::new(api_key, self.config))
    }
}

impl Default for GroqBuilder {
    fn default() -> Self {
        Self::new()
    }
}
