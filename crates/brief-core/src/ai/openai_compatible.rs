//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! the hosted OpenAI API, vLLM, LocalAI, llama-server, Docker Model Runner.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ApiKeyConfig;
use crate::error::{Error, Result};
use crate::models::{GeneratedContent, GenerationRequest};

use super::prompts::{system_prompt, user_prompt};
use super::{non_empty, transport_error, AIBackend};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1000;

/// OpenAI-compatible backend
///
/// Works with any server implementing the OpenAI `/v1/chat/completions` API.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<ApiKeyConfig>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self::with_client(Client::new(), base_url, model)
    }

    /// Create with a preconfigured HTTP client (timeouts etc.)
    pub fn with_client(http_client: Client, base_url: &str, model: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Attach an API key sent as a bearer token
    pub fn with_api_key(mut self, api_key: ApiKeyConfig) -> Self {
        self.api_key = Some(api_key);
        self
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key {
            Some(ref key) => builder.bearer_auth(&key.api_key),
            None => builder,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt(request.insight_type).to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(request),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let response = self
            .authorize(self.http_client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "OpenAI-compatible API returned an error");
            return Err(Error::Generation(format!("OpenAI API error {}", status)));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Invalid chat completion response: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Generation("No choices in chat completion response".into()))?;
        debug!(model = %self.model, chars = content.len(), "Chat completion received");

        Ok(GeneratedContent {
            content: non_empty(content, "OpenAI-compatible backend")?,
            confidence: None,
            action_items: Vec::new(),
        })
    }

    async fn health_check(&self) -> bool {
        // Try /v1/models first (standard OpenAI endpoint)
        if let Ok(resp) = self
            .authorize(self.http_client.get(format!("{}/v1/models", self.base_url)))
            .send()
            .await
        {
            if resp.status().is_success() {
                return true;
            }
        }

        // Try /health (common for LocalAI, llama-server)
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
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
    use crate::config::KeySource;
    use crate::models::InsightType;
    use crate::test_utils::MockLlmServer;

    #[tokio::test]
    async fn test_generate_against_mock_server() {
        let mut server = MockLlmServer::start().await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "gpt-4o-mini").with_api_key(
            ApiKeyConfig {
                api_key: "sk-test".to_string(),
                source: KeySource::Env,
            },
        );

        let request = GenerationRequest::new("Automate invoicing", InsightType::Automation)
            .with_context("Accounting team of 3");
        let generated = backend.generate(&request).await.unwrap();

        assert!(generated.content.contains("Automate"));
        assert!(backend.health_check().await);
        server.stop();
    }

    #[tokio::test]
    async fn test_empty_choice_is_generation_failure() {
        let mut server = MockLlmServer::start_empty().await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "gpt-4o-mini");

        let request = GenerationRequest::new("Anything", InsightType::General);
        let err = backend.generate(&request).await.unwrap_err();

        assert!(matches!(err, Error::Generation(_)));
        server.stop();
    }

    #[tokio::test]
    async fn test_error_status_hides_upstream_body() {
        let mut server = MockLlmServer::start_failing().await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "gpt-4o-mini");

        let request = GenerationRequest::new("Anything", InsightType::General);
        let err = backend.generate(&request).await.unwrap_err();

        assert!(matches!(err, Error::Generation(_)));
        assert!(err.to_string().contains("500"));
        assert!(!err.to_string().contains("model failed to load"));
        server.stop();
    }
}
