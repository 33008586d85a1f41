//! Test utilities for brief-core
//!
//! A mock LLM server speaking both the Ollama and the OpenAI-compatible
//! protocols, for backend tests and local development.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// How the mock server answers generation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Failing,
    Empty,
}

/// Mock LLM server for testing and development
pub struct MockLlmServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(Mode::Normal).await
    }

    /// Start a server that answers every generation with HTTP 500
    pub async fn start_failing() -> Self {
        Self::start_with(Mode::Failing).await
    }

    /// Start a server that answers every generation with no text
    pub async fn start_empty() -> Self {
        Self::start_with(Mode::Empty).await
    }

    async fn start_with(mode: Mode) -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(mode);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pick a reply from the system prompt's persona
fn reply_for(system: &str) -> &'static str {
    if system.contains("analyst") {
        "Customer churn rose to 4% this quarter.\n\
         - Retention is strongest among annual plans\n\
         - Acquisition costs climbed with paid search"
    } else if system.contains("advisor") {
        "Raise prices on the entry plan.\n\
         - Grandfather existing customers for six months\n\
         - Bundle onboarding into the higher tiers"
    } else if system.contains("automation") {
        "Automate the weekly reporting workflow.\n\
         - Trigger the export from the CRM on a schedule\n\
         - Post the summary to the team channel"
    } else {
        "Focus on the few customers who drive most of the revenue."
    }
}

async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
        }],
    })
}

async fn handle_generate(State(mode): State<Mode>, Json(request): Json<GenerateRequest>) -> Response {
    let response = match mode {
        Mode::Failing => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "model failed to load").into_response()
        }
        Mode::Empty => String::new(),
        Mode::Normal => reply_for(&request.system).to_string(),
    };

    Json(GenerateResponse {
        model: request.model,
        response,
        done: true,
    })
    .into_response()
}

async fn handle_models() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "object": "list",
        "data": [{"id": "gpt-4o-mini", "object": "model"}]
    }))
}

async fn handle_chat(State(mode): State<Mode>, Json(request): Json<ChatRequest>) -> Response {
    let system = request
        .messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    let choices = match mode {
        Mode::Failing => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "model failed to load").into_response()
        }
        Mode::Empty => Vec::new(),
        Mode::Normal => vec![serde_json::json!({
            "index": 0,
            "message": {"role": "assistant", "content": reply_for(system)},
            "finish_reason": "stop"
        })],
    };

    Json(serde_json::json!({
        "id": "chatcmpl-mock",
        "model": request.model,
        "choices": choices
    }))
    .into_response()
}

// Request/Response types for the mock server

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    #[serde(default)]
    system: String,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}
