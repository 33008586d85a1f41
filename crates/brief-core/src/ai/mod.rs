//! Pluggable text-generation backend abstraction
//!
//! The insight pipeline treats the LLM as an opaque collaborator: one
//! request in, one block of text out. Everything after that (classification,
//! suggestion extraction) happens locally and synchronously.
//!
//! # Architecture
//!
//! - `AIBackend` trait: the generation interface every backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AiConfig::resolve(None)?;
//! if let Some(client) = AIClient::from_config(&config)? {
//!     let request = GenerationRequest::new("How is Q3 looking?", InsightType::Analysis);
//!     let generated = client.generate(&request).await?;
//!     println!("{}", generated.content);
//! }
//! ```
//!
//! See [`crate::config`] for the configuration keys and environment variables.

mod mock;
mod ollama;
mod openai_compatible;
pub mod prompts;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{AiConfig, BackendKind};
use crate::error::{Error, Result};
use crate::models::{GeneratedContent, GenerationRequest};

/// Trait defining the interface for all text-generation backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate insight text for a request
    ///
    /// Transport failures, error statuses and empty responses are all
    /// reported as `Error::Generation`.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (hosted API, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from configuration
    ///
    /// Returns None if the selected backend has no host configured.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let host = config.host.as_deref().unwrap_or_default();
        let model = config.model.as_deref().unwrap_or_default();

        let client = match config.backend {
            BackendKind::Ollama => {
                AIClient::Ollama(OllamaBackend::with_client(http_client(timeout)?, host, model))
            }
            BackendKind::OpenaiCompatible => {
                let mut backend =
                    OpenAICompatibleBackend::with_client(http_client(timeout)?, host, model);
                if let Some(key) = config.api_key()? {
                    tracing::debug!(source = ?key.source, "Using API key for OpenAI-compatible backend");
                    backend = backend.with_api_key(key);
                }
                AIClient::OpenAICompatible(backend)
            }
            BackendKind::Mock => AIClient::Mock(MockBackend::new()),
        };

        Ok(Some(client))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Backend kind of this client
    pub fn kind(&self) -> BackendKind {
        match self {
            AIClient::Ollama(_) => BackendKind::Ollama,
            AIClient::OpenAICompatible(_) => BackendKind::OpenaiCompatible,
            AIClient::Mock(_) => BackendKind::Mock,
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent> {
        match self {
            AIClient::Ollama(b) => b.generate(request).await,
            AIClient::OpenAICompatible(b) => b.generate(request).await,
            AIClient::Mock(b) => b.generate(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Wrap a transport error as a generation failure
pub(crate) fn transport_error(url: &str, err: reqwest::Error) -> Error {
    Error::Generation(format!("Request to {} failed: {}", url, err))
}

/// Reject blank generated text
pub(crate) fn non_empty(content: String, backend: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::Generation(format!("{} returned no content", backend)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InsightType;

    #[test]
    fn test_from_config_unconfigured() {
        let config = AiConfig::default();
        assert!(AIClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_ollama() {
        let config = AiConfig {
            host: Some("http://localhost:11434/".to_string()),
            model: Some("gemma3".to_string()),
            ..Default::default()
        };
        let client = AIClient::from_config(&config).unwrap().unwrap();

        assert_eq!(client.kind(), BackendKind::Ollama);
        assert_eq!(client.host(), "http://localhost:11434");
        assert_eq!(client.model(), "gemma3");
    }

    #[test]
    fn test_from_config_mock() {
        let config = AiConfig {
            backend: BackendKind::Mock,
            ..Default::default()
        };
        let client = AIClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.kind(), BackendKind::Mock);
    }

    #[tokio::test]
    async fn test_client_delegates_to_mock() {
        let client = AIClient::mock();
        let request = GenerationRequest::new("Quarterly review", InsightType::Analysis);
        let generated = client.generate(&request).await.unwrap();

        assert!(!generated.content.is_empty());
        assert!(client.health_check().await);
    }

    #[test]
    fn test_non_empty_rejects_whitespace() {
        assert!(matches!(
            non_empty("  \n ".to_string(), "test"),
            Err(Error::Generation(_))
        ));
        assert_eq!(non_empty(" ok ".to_string(), "test").unwrap(), "ok");
    }
}
