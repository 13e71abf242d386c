//! Liveness and identity endpoints.

use crate::AppState;
use axum::extract::State;
use mentor_core::API_VERSION;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    gemini_available: bool,
    knowledge_base_entries: usize,
}

/// GET /health – model availability and knowledge base size.
pub(crate) async fn health(State(state): State<AppState>) -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy",
        gemini_available: state.orchestrator.model_available(),
        knowledge_base_entries: state.orchestrator.knowledge().entry_count(),
    })
}

/// GET / – banner with app name and API version.
pub(crate) async fn root(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "message": format!("Chat API for {} is running", state.config.app_name),
        "version": API_VERSION,
    }))
}
