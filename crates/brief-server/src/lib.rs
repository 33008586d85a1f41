//! Brief Web Server
//!
//! Axum-based REST API for generating, classifying, browsing and exporting
//! business insights.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (pagination limits)
//! - Sanitized error responses
//!
//! There is no authentication layer; bind to localhost or put the server
//! behind an authenticating proxy.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use brief_core::ai::{AIBackend, AIClient};
use brief_core::config::AiConfig;
use brief_core::db::Database;
use brief_core::pipeline::InsightPipeline;

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Text-generation backend settings
    pub ai: AiConfig,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub ai: Option<AIClient>,
    pub pipeline: InsightPipeline,
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
///
/// Builds the AI client from `config.ai`. A configuration error is logged
/// and leaves generation disabled.
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let ai = match AIClient::from_config(&config.ai) {
        Ok(ai) => ai,
        Err(e) => {
            warn!(error = %e, "Invalid AI configuration, insight generation disabled");
            None
        }
    };
    create_router_with_ai(db, config, ai)
}

/// Create the application router with an explicit AI client (for testing)
pub fn create_router_with_ai(db: Database, config: ServerConfig, ai: Option<AIClient>) -> Router {
    if let Some(ref client) = ai {
        info!(
            backend = client.kind().as_str(),
            host = client.host(),
            model = client.model(),
            "AI backend configured"
        );
    } else {
        info!("ℹ️  AI backend not configured (set OLLAMA_HOST or BRIEF_AI_BACKEND to enable generation)");
    }

    let state = Arc::new(AppState {
        db,
        ai,
        pipeline: InsightPipeline::from_config(&config.ai),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Insights
        .route("/insights", get(handlers::list_insights))
        .route("/insights/generate", post(handlers::generate_insight))
        .route(
            "/insights/:id",
            get(handlers::get_insight).delete(handlers::delete_insight),
        )
        .route("/insights/:id/export", get(handlers::export_insight))
        // Classification without generation
        .route("/classify", post(handlers::classify_content))
        // Analytics
        .route("/analytics", get(handlers::get_analytics))
        // Export
        .route("/export/insights", get(handlers::export_insights));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    let config = ServerConfig {
        ai: AiConfig::from_env()?,
        ..Default::default()
    };
    serve_with_config(db, host, port, config).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let ai = AIClient::from_config(&config.ai)?;
    check_ai_connection(ai.as_ref()).await;

    let app = create_router_with_ai(db, config, ai);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(ai: Option<&AIClient>) {
    match ai {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ AI backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  AI backend configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("ℹ️  AI backend not configured, insight generation will return 503");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn bad_gateway(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_GATEWAY, msg)
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self::with_status(StatusCode::SERVICE_UNAVAILABLE, msg)
    }

    /// Map a core error to a client-facing status
    ///
    /// Storage and serialization errors stay opaque; validation and
    /// backend failures carry their message.
    pub fn from_core(err: brief_core::Error) -> Self {
        use brief_core::Error;

        match err {
            Error::InvalidData(msg) => Self::bad_request(&msg),
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::Generation(msg) => {
                warn!(error = %msg, "Insight generation failed");
                Self::bad_gateway(&format!("Insight generation failed: {}", msg))
            }
            other => other.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
