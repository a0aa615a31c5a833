//! External provider clients
//!
//! Each provider wraps one vendor HTTP API behind a small trait so the orchestrator can
//! be driven by fakes in tests.
//!
//! # Available Providers
//!
//! - **Gemini**: image captioning (multimodal `generateContent`)
//! - **Groq**: prompt refinement (OpenAI-compatible chat completions)
//! - **KIE**: task-based video generation
//! - **Cloudinary**: hosting for inline-encoded images

use crate::{CreateTaskRequest, ProviderTask, Result};
use async_trait::async_trait;

pub mod cloudinary;
pub mod gemini;
pub mod groq;
pub mod kie;

// Provider re-exports
pub use cloudinary::CloudinaryHost;
pub use gemini::GeminiCaptioner;
pub use groq::GroqRefiner;
pub use kie::KieGenerator;

/// Produces a text description of an image
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Describe the image behind a public URL.
    ///
    /// Implementations own their retry behaviour.
    async fn describe(&self, image_url: &str) -> Result<String>;
}

/// Rewrites a description into a generation prompt
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PromptRefiner: Send + Sync {
    async fn refine(&self, description: &str) -> Result<String>;
}

/// Task-based media generation
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Submit a generation job and return the provider's raw response.
    ///
    /// Called exactly once per invocation; fallback models are chosen by the caller.
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<serde_json::Value>;

    /// Look up the current state of a previously created job
    async fn task_status(&self, task_id: &str) -> Result<ProviderTask>;
}

/// Turns an inline `data:image/...` payload into a public HTTPS URL
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, data_url: &str) -> Result<String>;
}

/// Read a non-2xx response into a provider error carrying status and body
pub(crate) async fn error_from_response(
    provider: &'static str,
    context: &str,
    response: reqwest::Response,
) -> crate::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    crate::Error::provider(provider, format!("{} {}: {}", context, status, body))
}
