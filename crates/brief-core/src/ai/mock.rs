//! Mock backend for testing
//!
//! Returns canned insight text per insight type, so classification and
//! suggestion extraction downstream are deterministic. Useful for unit tests
//! and for running the server without an LLM.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{GeneratedContent, GenerationRequest, InsightType};

use super::AIBackend;

const ANALYSIS_TEXT: &str = "Revenue grew 12% over the quarter while operating costs held flat, \
widening the gross margin.

Key findings:
• Revenue growth came mostly from existing accounts
• Operating costs finished 4% under budget
• Cash flow stayed positive for the third month running";

const RECOMMENDATION_TEXT: &str = "There is a clear opportunity for growth in the mid sized segment.

Recommendations:
• Expand into two adjacent regions this year
• Form a referral partnership with a complementary vendor
• Monitor win rates monthly to confirm the expansion is paying off";

const AUTOMATION_TEXT: &str = "Invoice approval is still handled by email, which slows the \
month end close.

Opportunities:
• Automate invoice matching with a scheduled script
• Send approval requests through the accounting platform
• Trigger payment reminders when invoices age past 30 days";

const GENERAL_TEXT: &str = "Keep the plan simple: agree on three goals for the quarter and \
review them with the team every month.
- Name a single owner for each goal
- Share progress in the first meeting of each month";

/// Mock AI backend for testing
///
/// Returns predictable responses. Can be configured with a fixed response
/// or a failure for specific tests.
#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    response: Option<GeneratedContent>,
    fail_with: Option<String>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self::default()
    }

    /// Create a mock whose every generation fails with this message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            healthy: true,
            fail_with: Some(message.into()),
            ..Default::default()
        }
    }

    /// Return this content for every request instead of the canned text
    pub fn with_response(mut self, response: GeneratedContent) -> Self {
        self.response = Some(response);
        self
    }

    /// Canned text returned for an insight type
    pub fn canned_text(insight_type: InsightType) -> &'static str {
        match insight_type {
            InsightType::Analysis => ANALYSIS_TEXT,
            InsightType::Recommendation => RECOMMENDATION_TEXT,
            InsightType::Automation => AUTOMATION_TEXT,
            InsightType::General => GENERAL_TEXT,
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent> {
        if let Some(ref message) = self.fail_with {
            return Err(Error::Generation(message.clone()));
        }
        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }
        Ok(GeneratedContent {
            content: Self::canned_text(request.insight_type).to_string(),
            confidence: None,
            action_items: Vec::new(),
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_text_per_type() {
        let mock = MockBackend::new();
        for insight_type in InsightType::ALL {
            let request = GenerationRequest::new("Anything", insight_type);
            let generated = mock.generate(&request).await.unwrap();
            assert_eq!(generated.content, MockBackend::canned_text(insight_type));
            assert!(generated.confidence.is_none());
        }
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockBackend::failing("model overloaded");
        let request = GenerationRequest::new("Anything", InsightType::General);

        match mock.generate(&request).await {
            Err(Error::Generation(msg)) => assert_eq!(msg, "model overloaded"),
            other => panic!("expected generation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fixed_response_and_health() {
        let mock = MockBackend::unhealthy().with_response(GeneratedContent {
            content: "Fixed".to_string(),
            confidence: Some(0.4),
            action_items: vec!["Call the bank".to_string()],
        });
        let request = GenerationRequest::new("Anything", InsightType::Analysis);
        let generated = mock.generate(&request).await.unwrap();

        assert_eq!(generated.content, "Fixed");
        assert_eq!(generated.confidence, Some(0.4));
        assert!(!mock.health_check().await);
    }
}
