//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use brief_core::models::{GenerationRequest, Insight, InsightFilter, InsightType};

/// Request body for generating an insight
#[derive(Debug, Deserialize)]
pub struct GenerateInsightRequest {
    pub prompt: String,
    #[serde(default)]
    pub context: Option<String>,
    /// Insight type; unknown or missing values mean "general"
    #[serde(rename = "type", default)]
    pub insight_type: Option<String>,
}

/// Query parameters for listing insights
#[derive(Debug, Deserialize)]
pub struct InsightQuery {
    /// Filter by insight type
    #[serde(rename = "type")]
    pub insight_type: Option<String>,
    pub limit: Option<usize>,
}

/// Parse an optional type filter, rejecting unknown values
pub(crate) fn parse_type_filter(value: Option<&str>) -> Result<Option<InsightType>, AppError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse::<InsightType>()
            .map(Some)
            .map_err(|e| AppError::bad_request(&e)),
        None => Ok(None),
    }
}

/// POST /api/insights/generate - Generate, classify and store an insight
pub async fn generate_insight(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateInsightRequest>,
) -> Result<Json<Insight>, AppError> {
    if body.prompt.trim().is_empty() {
        return Err(AppError::bad_request("Prompt is required"));
    }

    let ai = state
        .ai
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("AI backend not configured"))?;

    let insight_type = body
        .insight_type
        .as_deref()
        .map(InsightType::parse_lenient)
        .unwrap_or_default();
    let request = GenerationRequest {
        prompt: body.prompt,
        context: body.context,
        insight_type,
    };

    let insight = state
        .pipeline
        .generate(ai, &request)
        .await
        .map_err(AppError::from_core)?;
    state.db.insert_insight(&insight).map_err(AppError::from_core)?;

    info!(id = %insight.id, "Stored generated insight");
    Ok(Json(insight))
}

/// GET /api/insights - List insights, newest first
pub async fn list_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightQuery>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let filter = InsightFilter {
        insight_type: parse_type_filter(params.insight_type.as_deref())?,
        limit: Some(params.limit.unwrap_or(MAX_PAGE_LIMIT).min(MAX_PAGE_LIMIT)),
    };

    let insights = state.db.list_insights(&filter)?;
    Ok(Json(insights))
}

/// GET /api/insights/:id - Get a specific insight
pub async fn get_insight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Insight>, AppError> {
    let insight = state
        .db
        .get_insight(&id)?
        .ok_or_else(|| AppError::not_found("Insight not found"))?;
    Ok(Json(insight))
}

/// DELETE /api/insights/:id - Delete an insight
pub async fn delete_insight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_insight(&id)? {
        return Err(AppError::not_found("Insight not found"));
    }

    info!(id = %id, "Deleted insight");
    Ok(Json(SuccessResponse { success: true }))
}
