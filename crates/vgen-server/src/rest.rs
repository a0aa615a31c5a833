use crate::download::download_proxy;
use crate::error::AppError;
use crate::types::*;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Instrument, Level};
use uuid::Uuid;
use vgen_core::{GenerationRequest, ProviderTask};
use vgen_orchestrator::Orchestrator;
use vgen_telemetry::request_span;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    /// Outbound client for the download proxy
    pub http: reqwest::Client,
}

pub fn create_router(orchestrator: Arc<Orchestrator>, max_body_bytes: usize) -> Router {
    let state = AppState {
        orchestrator,
        http: reqwest::Client::new(),
    };

    Router::new()
        // Health check endpoints
        .route("/health", get(health_check))
        .route("/readiness", get(readiness_check))
        // API endpoints
        .route("/generate", post(generate))
        .route("/tasks/:task_id", get(task_status))
        .route("/download", get(download_proxy))
        .route("/chat", post(chat))
        // Middleware layers (applied in reverse order)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint - returns OK if the service is running
async fn health_check() -> impl IntoResponse {
    tracing::debug!("Health check requested");
    (StatusCode::OK, "OK")
}

/// Readiness check endpoint - providers are injected at startup
async fn readiness_check(State(_state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("Readiness check requested");
    (StatusCode::OK, "READY")
}

async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, AppError> {
    let request_id = Uuid::new_v4().to_string();

    async move {
        let body = body?;

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.contains("multipart/form-data") {
            return Err(AppError::bad_request(
                "multipart/form-data detected. Please send JSON with prompt and optional \
                 imageBase64 (data URL) or image_url.",
            ));
        }

        let body: Value = serde_json::from_slice(&body)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))?;

        let request = GenerationRequest::from_json(&body);
        let outcome = state.orchestrator.generate(request).await?;
        Ok(Json(generate_response_body(outcome)?))
    }
    .instrument(request_span(&request_id))
    .await
}

async fn task_status(
    Path(task_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProviderTask>, AppError> {
    let task = state.orchestrator.task_status(&task_id).await?;
    Ok(Json(task))
}

/// Echo endpoint backing the plain chat view
async fn chat(body: Result<Bytes, BytesRejection>) -> Result<Json<ChatResponse>, AppError> {
    let req: ChatRequest = serde_json::from_slice(&body?)
        .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))?;

    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Message is required"))?;

    Ok(Json(ChatResponse {
        message,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
