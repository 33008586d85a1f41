//! Insight pipeline - turns one generation request into a classified insight
//!
//! The backend is awaited exactly once. Everything after that is local:
//! classification, suggestion extraction, id and timestamp assignment.

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{info, warn};

use crate::ai::AIBackend;
use crate::classify::classify;
use crate::config::{AiConfig, DEFAULT_CONFIDENCE};
use crate::error::{Error, Result};
use crate::ids::new_insight_id;
use crate::models::{GeneratedContent, GenerationRequest, Insight};
use crate::suggestions::extract_suggestions;

/// Builds insights from backend output
#[derive(Debug, Clone, Copy)]
pub struct InsightPipeline {
    default_confidence: f64,
}

impl Default for InsightPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightPipeline {
    pub fn new() -> Self {
        Self {
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new().with_default_confidence(config.default_confidence)
    }

    /// Confidence assigned when the backend reports none
    pub fn with_default_confidence(mut self, confidence: f64) -> Self {
        self.default_confidence = clamp_unit(confidence).unwrap_or(DEFAULT_CONFIDENCE);
        self
    }

    pub fn default_confidence(&self) -> f64 {
        self.default_confidence
    }

    /// Generate, classify and assemble one insight
    ///
    /// Fails with `InvalidData` on an empty prompt and with `Generation`
    /// when the backend fails or returns blank text.
    pub async fn generate<B: AIBackend + ?Sized>(
        &self,
        ai: &B,
        request: &GenerationRequest,
    ) -> Result<Insight> {
        if request.prompt.trim().is_empty() {
            return Err(Error::InvalidData("Prompt must not be empty".to_string()));
        }

        let generated = ai.generate(request).await.map_err(|e| match e {
            Error::Generation(msg) => Error::Generation(msg),
            other => Error::Generation(other.to_string()),
        });
        let generated = match generated {
            Ok(g) => g,
            Err(e) => {
                warn!(
                    model = ai.model(),
                    insight_type = request.insight_type.as_str(),
                    error = %e,
                    "Insight generation failed"
                );
                return Err(e);
            }
        };

        let insight = self.build_insight(request, generated, Utc::now())?;
        info!(
            id = %insight.id,
            insight_type = insight.insight_type.as_str(),
            category = insight.category_or_default(),
            priority = insight.priority_or_default().as_str(),
            suggestions = insight.suggestions.len(),
            "Insight generated"
        );
        Ok(insight)
    }

    /// Assemble an insight from backend output at a given time
    ///
    /// The timestamp is truncated to milliseconds, the precision the store
    /// keeps.
    pub fn build_insight(
        &self,
        request: &GenerationRequest,
        generated: GeneratedContent,
        timestamp: DateTime<Utc>,
    ) -> Result<Insight> {
        let content = generated.content.trim();
        if content.is_empty() {
            return Err(Error::Generation("Backend returned no content".to_string()));
        }

        let classification = classify(content, request.insight_type);
        let confidence = generated
            .confidence
            .and_then(clamp_unit)
            .unwrap_or(self.default_confidence);
        let action_items = generated
            .action_items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();

        Ok(Insight {
            id: new_insight_id(),
            timestamp: timestamp.trunc_subsecs(3),
            insight_type: request.insight_type,
            category: Some(classification.category),
            priority: Some(classification.priority),
            confidence: Some(confidence),
            suggestions: extract_suggestions(content),
            content: content.to_string(),
            action_items,
        })
    }
}

fn clamp_unit(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::models::{InsightType, Priority};

    #[tokio::test]
    async fn test_generate_with_mock() {
        let pipeline = InsightPipeline::new();
        let request = GenerationRequest::new("How did the quarter go?", InsightType::Analysis);

        let insight = pipeline
            .generate(&MockBackend::new(), &request)
            .await
            .unwrap();

        assert_eq!(insight.insight_type, InsightType::Analysis);
        assert_eq!(insight.category.as_deref(), Some("Financial Performance"));
        assert_eq!(insight.priority, Some(Priority::Medium));
        assert_eq!(insight.confidence, Some(DEFAULT_CONFIDENCE));
        assert_eq!(insight.suggestions.len(), 3);
        assert!(!insight.id.is_empty());
    }

    #[tokio::test]
    async fn test_generate_recommendation_is_low_priority_growth() {
        let pipeline = InsightPipeline::new();
        let request = GenerationRequest::new("Where should we grow?", InsightType::Recommendation);

        let insight = pipeline
            .generate(&MockBackend::new(), &request)
            .await
            .unwrap();

        assert_eq!(insight.category.as_deref(), Some("Growth Strategy"));
        assert_eq!(insight.priority, Some(Priority::Low));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let pipeline = InsightPipeline::new();
        let request = GenerationRequest::new("   ", InsightType::General);

        let err = pipeline
            .generate(&MockBackend::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let pipeline = InsightPipeline::new();
        let request = GenerationRequest::new("Anything", InsightType::General);

        let err = pipeline
            .generate(&MockBackend::failing("timeout"), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Generation(ref m) if m == "timeout"));
    }

    #[tokio::test]
    async fn test_blank_content_is_failure() {
        let pipeline = InsightPipeline::new();
        let mock = MockBackend::new().with_response(GeneratedContent {
            content: " \n ".to_string(),
            ..Default::default()
        });
        let request = GenerationRequest::new("Anything", InsightType::General);

        let err = pipeline.generate(&mock, &request).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_build_insight_clamps_confidence_and_filters_actions() {
        let pipeline = InsightPipeline::new().with_default_confidence(0.5);
        let request = GenerationRequest::new("Cash", InsightType::Analysis);
        let now = Utc::now();

        let insight = pipeline
            .build_insight(
                &request,
                GeneratedContent {
                    content: "URGENT: cash flow shortfall next month".to_string(),
                    confidence: Some(1.7),
                    action_items: vec!["  Call the bank ".to_string(), "   ".to_string()],
                },
                now,
            )
            .unwrap();

        assert_eq!(insight.timestamp, now.trunc_subsecs(3));
        assert_eq!(insight.timestamp.timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(insight.confidence, Some(1.0));
        assert_eq!(insight.priority, Some(Priority::High));
        assert_eq!(insight.category.as_deref(), Some("Financial Performance"));
        assert_eq!(insight.action_items, vec!["Call the bank".to_string()]);
    }

    #[test]
    fn test_non_finite_confidence_uses_default() {
        let pipeline = InsightPipeline::new().with_default_confidence(0.6);
        let request = GenerationRequest::new("Plan", InsightType::General);

        let insight = pipeline
            .build_insight(
                &request,
                GeneratedContent {
                    content: "Plan the quarter".to_string(),
                    confidence: Some(f64::NAN),
                    action_items: Vec::new(),
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(insight.confidence, Some(0.6));
    }

    #[test]
    fn test_from_config() {
        let config = AiConfig {
            default_confidence: 0.7,
            ..Default::default()
        };
        assert_eq!(InsightPipeline::from_config(&config).default_confidence(), 0.7);
    }
}
