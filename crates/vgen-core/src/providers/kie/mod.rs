//! KIE media generation provider
//!
//! Jobs are asynchronous: `createTask` returns an identifier and `recordInfo` reports
//! progress until a terminal state.

pub mod generator;
pub mod types;

pub use generator::KieGenerator;

use crate::config::{KieSettings, require_key};

#[derive(Clone, Debug)]
pub struct KieConfig {
    /// Base URL for API requests
    pub base_url: String,
}

impl KieConfig {
    pub fn from_settings(settings: &KieSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for KieConfig {
    fn default() -> Self {
        Self::from_settings(&KieSettings::default())
    }
}

/// Builder for KieGenerator
pub struct KieBuilder {
    api_key: Option<String>,
    config: KieConfig,
}

impl KieBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            config: KieConfig::default(),
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

    pub fn build(self) -> crate::Result<KieGenerator> {
        let api_key = require_key(&self.api_key, "kie", "KIE_API_KEY")?;
        Ok(KieGenerator::new(api_key, self.config))
    }
}

impl Default for KieBuilder {
    fn default() -> Self {
        Self::new()
    }
}
