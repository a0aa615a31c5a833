//! Per-request lifecycle tracking

use std::fmt;

/// Where a single generation request currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    PromptResolution,
    PromptReady,
    TaskCreation,
    TaskCreated,
    Failed,
}

impl RequestStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStage::TaskCreated | RequestStage::Failed)
    }

    /// Legal forward edges; any non-terminal stage may fail
    pub fn can_transition_to(&self, next: RequestStage) -> bool {
        use RequestStage::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Received, PromptResolution) | (Received, PromptReady) => true,
            (PromptResolution, PromptReady) => true,
            (PromptReady, TaskCreation) => true,
            (TaskCreation, TaskCreated) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestStage::Received => "received",
            RequestStage::PromptResolution => "prompt_resolution",
            RequestStage::PromptReady => "prompt_ready",
            RequestStage::TaskCreation => "task_creation",
            RequestStage::TaskCreated => "task_created",
            RequestStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Records the stages a request passed through
#[derive(Debug, Clone)]
pub struct StageTracker {
    history: Vec<RequestStage>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            history: vec![RequestStage::Received],
        }
    }

    pub fn current(&self) -> RequestStage {
        *self.history.last().unwrap_or(&RequestStage::Received)
    }

    /// Move to `next`; illegal edges are logged and ignored
    pub fn advance(&mut self, next: RequestStage) {
        let current = self.current();
        if current.can_transition_to(next) {
            tracing::debug!(from = %current, to = %next, "Request stage transition");
            self.history.push(next);
        } else {
            tracing::warn!(from = %current, to = %next, "Ignoring illegal stage transition");
        }
    }

    pub fn fail(&mut self) {
        self.advance(RequestStage::Failed);
    }

    pub fn history(&self) -> &[RequestStage] {
        &self.history
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}
