//! Brief Core Library
//!
//! Shared functionality for the Brief business-insight tool:
//! - Keyword classification of insight text (priority and category)
//! - Suggestion extraction from bullet and numbered lines
//! - Analytics over a collection of insights
//! - CSV and JSON export
//! - Pluggable text-generation backends (Ollama, OpenAI-compatible, mock)
//! - Insight pipeline and SQLite insight store

pub mod ai;
pub mod analytics;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod ids;
pub mod models;
pub mod pipeline;
pub mod suggestions;

/// Test utilities including a mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use analytics::{aggregate, AnalyticsSummary};
pub use classify::{classify, Classification};
pub use config::{AiConfig, ApiKeyConfig, BackendKind, KeySource};
pub use db::Database;
pub use error::{Error, Result};
pub use export::{export_insights_csv, ExportFormat};
pub use ids::new_insight_id;
pub use models::{GeneratedContent, GenerationRequest, Insight, InsightFilter, InsightType, Priority};
pub use pipeline::InsightPipeline;
pub use suggestions::extract_suggestions;
