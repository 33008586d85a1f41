//! Classification handler
//!
//! Runs the keyword classifier and suggestion extractor on caller-supplied
//! text without generating or storing anything.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::AppError;
use brief_core::classify::classify;
use brief_core::models::{InsightType, Priority};
use brief_core::suggestions::extract_suggestions;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub content: String,
    /// Insight type; unknown or missing values mean "general"
    #[serde(rename = "type", default)]
    pub insight_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub category: String,
    pub priority: Priority,
    pub suggestions: Vec<String>,
}

/// POST /api/classify - Classify text and extract suggestions
pub async fn classify_content(
    Json(body): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    if body.content.trim().is_empty() {
        return Err(AppError::bad_request("Content is required"));
    }

    let insight_type = body
        .insight_type
        .as_deref()
        .map(InsightType::parse_lenient)
        .unwrap_or_default();
    let classification = classify(&body.content, insight_type);

    Ok(Json(ClassifyResponse {
        insight_type,
        category: classification.category,
        priority: classification.priority,
        suggestions: extract_suggestions(&body.content),
    }))
}
