//! Span creation helpers for provider calls and inbound requests

use crate::attributes::*;

/// The external collaborator a span describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Captioning,
    Refinement,
    Generation,
    TaskStatus,
    ImageHost,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Captioning => "captioning",
            ProviderKind::Refinement => "refinement",
            ProviderKind::Generation => "generation",
            ProviderKind::TaskStatus => "task_status",
            ProviderKind::ImageHost => "image_host",
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            ProviderKind::Captioning => "describe_image",
            ProviderKind::Refinement => "refine_prompt",
            ProviderKind::Generation => "create_task",
            ProviderKind::TaskStatus => "task_status",
            ProviderKind::ImageHost => "upload_image",
        }
    }
}

/// Span wrapping a single outbound provider call.
///
/// `vgen.task_id` starts empty and can be recorded once the provider returns one.
pub fn provider_span(kind: ProviderKind, model: Option<&str>) -> tracing::Span {
    let span = tracing::info_span!(
        "provider_call",
        { GEN_AI_SYSTEM } = SYSTEM_NAME,
        { GEN_AI_OPERATION_NAME } = kind.operation(),
        { GEN_AI_REQUEST_MODEL } = tracing::field::Empty,
        { VGEN_PROVIDER } = kind.as_str(),
        { VGEN_TASK_ID } = tracing::field::Empty,
    );

    if let Some(model) = model {
        span.record(GEN_AI_REQUEST_MODEL, model);
    }
    span
}

/// Span covering one inbound generation request
pub fn request_span(request_id: &str) -> tracing::Span {
    tracing::info_span!(
        "generate",
        { VGEN_REQUEST_ID } = %request_id,
        { VGEN_FLOW } = tracing::field::Empty,
        { VGEN_TASK_ID } = tracing::field::Empty,
    )
}

/// Helper to safely serialize to JSON string
pub fn safe_serialize<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<not serializable>".to_string())
}
