//! # vgen Telemetry
//!
//! Tracing subscriber setup with OpenTelemetry integration, plus span helpers for the
//! outbound provider calls made while serving a generation request.

mod spans;
mod tracer;

pub use spans::{ProviderKind, provider_span, request_span, safe_serialize};
pub use tracer::{TelemetryOptions, init_telemetry, tracer_provider};

/// OpenTelemetry span attribute constants.
///
/// Generic attributes follow the OpenTelemetry generative AI conventions; `vgen.*`
/// attributes are specific to this service.
pub mod attributes {
    pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";
    pub const GEN_AI_SYSTEM: &str = "gen_ai.system";
    pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

    pub const VGEN_PROVIDER: &str = "vgen.provider";
    pub const VGEN_REQUEST_ID: &str = "vgen.request_id";
    pub const VGEN_FLOW: &str = "vgen.flow";
    pub const VGEN_TASK_ID: &str = "vgen.task_id";

    /// Default tracer name
    pub const SYSTEM_NAME: &str = "vgen";
}
