//! Analytics handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::insights::parse_type_filter;
use crate::{AppError, AppState};
use brief_core::analytics::{aggregate, AnalyticsSummary};
use brief_core::models::InsightFilter;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// Restrict the summary to one insight type
    #[serde(rename = "type")]
    pub insight_type: Option<String>,
}

/// GET /api/analytics - Dashboard statistics over stored insights
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let filter = InsightFilter {
        insight_type: parse_type_filter(params.insight_type.as_deref())?,
        limit: None,
    };
    let insights = state.db.list_insights(&filter)?;
    Ok(Json(aggregate(&insights)))
}
