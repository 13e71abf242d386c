//! Chat handler: resolves a mentor's message against the knowledge base, then the model.
//!
//! Every documented path answers 200 with `{ "response": ... }`; model failures are absorbed
//! by the fallback responder. Malformed bodies are rejected by the `Json` extractor.

use crate::AppState;
use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatResponse {
    response: String,
}

/// POST /chat
pub(crate) async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::info!(target: "mentor::chat", "Question received: {} chars", req.text.chars().count());

    let resolution = state.orchestrator.resolve(&req.text).await;

    tracing::info!(target: "mentor::chat", source = %resolution.source, "Answer ready");
    Json(ChatResponse {
        response: resolution.text,
    })
}
