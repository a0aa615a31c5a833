//! Gemini captioner implementation

use super::{GeminiConfig, types::*};
use crate::{
    Error, Result,
    providers::{Captioner, error_from_response},
    retry::{ErrorClass, RetryPolicy, retry_with_backoff},
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;

const PROVIDER: &str = "gemini";

/// Gemini captioner with overload-aware retries
pub struct GeminiCaptioner {
    client: Client,
    api_key: String,
    config: GeminiConfig,
    retry: RetryPolicy,
}

impl GeminiCaptioner {
    /// Create a new Gemini captioner
    pub fn new(api_key: String, config: GeminiConfig, retry: RetryPolicy) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
            retry,
        }
    }

    pub fn builder() -> super::GeminiBuilder {
        super::GeminiBuilder::new()
    }

    fn build_url(&self) -> String {
        format!("{}/{}:generateContent", self.config.base_url, self.config.model)
    }

    /// Download the image and inline it as base64
    async fn fetch_image(&self, image_url: &str) -> Result<InlineData> {
        let response = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to fetch image: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::provider(
                PROVIDER,
                format!("Failed to fetch image: {}", response.status()),
            ));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "image/jpeg".to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to read image: {}", e)))?;

        Ok(InlineData {
            mime_type,
            data: STANDARD.encode(&bytes),
        })
    }

    async fn generate_once(&self, request: &GeminiRequest) -> Result<String> {
        let response = self
            .client
            .post(self.build_url())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_from_response(PROVIDER, "Gemini API error", response).await);
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

        if let Some(error) = gemini_resp.error {
            return Err(Error::provider(
                PROVIDER,
                format!(
                    "Gemini API error: {} (code: {}, status: {})",
                    error.message,
                    error.code.unwrap_or(0),
                    error.status.unwrap_or_default()
                ),
            ));
        }

        let text = gemini_resp
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(Content::text)
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(Error::provider(PROVIDER, "Gemini returned an empty description"));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl Captioner for GeminiCaptioner {
    async fn describe(&self, image_url: &str) -> Result<String> {
        // Image download happens once; only the model call is retried
        let image = self.fetch_image(image_url).await?;

        let request = GeminiRequest {
            contents: vec![Content::image_with_text(image, self.config.caption_prompt.clone())],
            generation_config: Some(GenerationConfig {
                temperature: Some(self.config.temperature),
            }),
        };

        let request = &request;
        retry_with_backoff(&self.retry, ErrorClass::of_overload, move |attempt| {
            tracing::debug!(attempt, model = %self.config.model, "Calling Gemini generateContent");
            self.generate_once(request)
        })
        .await
    }
}
