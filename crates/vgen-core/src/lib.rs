//! Core types and provider clients for vgen
//!
//! This crate holds the request/task data model, the error taxonomy, configuration
//! loading and the HTTP clients for the captioning, refinement, generation and
//! image hosting providers.

pub mod config;
pub mod error;
pub mod providers;
pub mod retry;
pub mod task_id;
pub mod types;

// Re-exports
pub use config::VConfig;
pub use error::{Error, Result};
pub use providers::{Captioner, ImageHost, MediaGenerator, PromptRefiner};
pub use retry::{ErrorClass, RetryDecision, RetryPolicy, retry_with_backoff};
pub use task_id::{TASK_ID_PATHS, TaskIdPath, extract_task_id};
pub use types::{
    CreateTaskRequest, DescriptionResult, DescriptionSource, GenerationInput, GenerationParams,
    GenerationRequest, ProviderTask, TaskStatus, VideoDuration,
};
