//! Ollama backend implementation
//!
//! HTTP client for the Ollama `/api/generate` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{GeneratedContent, GenerationRequest};

use super::prompts::{system_prompt, user_prompt};
use super::{non_empty, transport_error, AIBackend};

/// Ollama backend
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self::with_client(Client::new(), base_url, model)
    }

    /// Create with a preconfigured HTTP client (timeouts etc.)
    pub fn with_client(http_client: Client, base_url: &str, model: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AIBackend for OllamaBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaRequest {
            model: &self.model,
            system: system_prompt(request.insight_type),
            prompt: user_prompt(request),
            stream: false,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Ollama API returned an error");
            return Err(Error::Generation(format!("Ollama API error {}", status)));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Invalid Ollama response: {}", e)))?;
        debug!(
            model = %self.model,
            chars = ollama_response.response.len(),
            "Ollama response received"
        );

        Ok(GeneratedContent {
            content: non_empty(ollama_response.response, "Ollama")?,
            confidence: None,
            action_items: Vec::new(),
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InsightType;
    use crate::test_utils::MockLlmServer;

    #[tokio::test]
    async fn test_generate_against_mock_server() {
        let mut server = MockLlmServer::start().await;
        let backend = OllamaBackend::new(&server.url(), "llama3.2");

        let request = GenerationRequest::new("Review our churn", InsightType::Analysis);
        let generated = backend.generate(&request).await.unwrap();

        assert!(generated.content.contains("Customer churn"));
        assert!(backend.health_check().await);
        server.stop();
    }

    #[tokio::test]
    async fn test_error_status_is_generation_failure() {
        let mut server = MockLlmServer::start_failing().await;
        let backend = OllamaBackend::new(&server.url(), "llama3.2");

        let request = GenerationRequest::new("Anything", InsightType::General);
        let err = backend.generate(&request).await.unwrap_err();

        assert!(matches!(err, Error::Generation(_)));
        assert!(err.to_string().contains("500"));
        assert!(!err.to_string().contains("model failed to load"));
        server.stop();
    }

    #[tokio::test]
    async fn test_unreachable_host_is_generation_failure() {
        let backend = OllamaBackend::new("http://127.0.0.1:9", "llama3.2");
        let request = GenerationRequest::new("Anything", InsightType::General);

        assert!(matches!(
            backend.generate(&request).await,
            Err(Error::Generation(_))
        ));
        assert!(!backend.health_check().await);
    }
}
