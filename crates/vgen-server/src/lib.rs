//! HTTP endpoint layer for vgen

pub mod bootstrap;
pub mod download;
pub mod error;
pub mod rest;
pub mod types;

pub use bootstrap::build_orchestrator;
pub use error::AppError;
pub use rest::{AppState, create_router};
pub use types::*;
