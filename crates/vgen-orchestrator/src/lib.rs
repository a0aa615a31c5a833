//! Task orchestration for vgen
//!
//! Sequences the captioning, refinement and generation providers for one request:
//! `Received -> PromptResolution -> PromptReady -> TaskCreation -> TaskCreated | Failed`.

pub mod orchestrator;
pub mod stage;

pub use orchestrator::{
    GenerationOutcome, ModelSelection, Orchestrator, OrchestratorBuilder, TaskCreation,
};
pub use stage::{RequestStage, StageTracker};
