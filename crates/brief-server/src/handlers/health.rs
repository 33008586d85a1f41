//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use brief_core::ai::AIBackend;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai_configured: bool,
    /// Backend kind, when one is configured
    pub ai_backend: Option<&'static str>,
    pub ai_model: Option<String>,
}

/// GET /api/health - Liveness and AI configuration
///
/// Does not contact the backend; `ai_configured` only reports whether a
/// client was built.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ai = state.ai.as_ref();
    Json(HealthResponse {
        status: "ok",
        ai_configured: ai.is_some(),
        ai_backend: ai.map(|c| c.kind().as_str()),
        ai_model: ai.map(|c| c.model().to_string()),
    })
}
