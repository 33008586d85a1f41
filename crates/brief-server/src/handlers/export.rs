//! Export handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Response, StatusCode},
};
use serde::Deserialize;
use tracing::info;

use super::insights::parse_type_filter;
use crate::{AppError, AppState};
use brief_core::export::{export_insight_json, export_insights as render, insight_file_name, ExportFormat};
use brief_core::models::InsightFilter;

/// Query parameters for insight export
#[derive(Debug, Deserialize)]
pub struct InsightExportQuery {
    /// Output format (default: csv)
    #[serde(default = "default_format")]
    pub format: String,
    /// Filter by insight type
    #[serde(rename = "type")]
    pub insight_type: Option<String>,
}

fn default_format() -> String {
    "csv".to_string()
}

fn attachment(content_type: &str, file_name: &str, body: String) -> Result<Response<Body>, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(body))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// GET /api/export/insights - Export stored insights to CSV or JSON
pub async fn export_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightExportQuery>,
) -> Result<Response<Body>, AppError> {
    let format: ExportFormat = params
        .format
        .parse()
        .map_err(|_| AppError::bad_request("Invalid format. Use 'csv' or 'json'"))?;

    let filter = InsightFilter {
        insight_type: parse_type_filter(params.insight_type.as_deref())?,
        limit: None,
    };
    let insights = state.db.list_insights(&filter)?;
    let body = render(&insights, format).map_err(AppError::from_core)?;
    info!(count = insights.len(), format = format.extension(), "Exported insights");

    attachment(
        format.content_type(),
        &format!("insights.{}", format.extension()),
        body,
    )
}

/// GET /api/insights/:id/export - Download one insight as JSON
pub async fn export_insight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, AppError> {
    let insight = state
        .db
        .get_insight(&id)?
        .ok_or_else(|| AppError::not_found("Insight not found"))?;
    let body = export_insight_json(&insight).map_err(AppError::from_core)?;

    attachment(
        ExportFormat::Json.content_type(),
        &insight_file_name(&insight),
        body,
    )
}
