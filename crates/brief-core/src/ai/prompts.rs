//! Prompt templates for insight generation
//!
//! Each insight type gets its own system prompt. The user prompt is the
//! caller's question with any supplied business context appended.

use crate::models::{GenerationRequest, InsightType};

const ANALYSIS_SYSTEM: &str = "You are a business analyst. Analyze the situation described \
by the user and explain what the numbers and signals mean for the business. Be specific and \
concise. Finish with 3 to 5 bullet points starting with \"- \" that summarize the key findings.";

const RECOMMENDATION_SYSTEM: &str = "You are a strategic business advisor. Give clear, \
actionable recommendations for the situation described by the user. Finish with 3 to 5 \
bullet points starting with \"- \", one concrete recommendation per bullet.";

const AUTOMATION_SYSTEM: &str = "You are a business process automation consultant. Identify \
manual work in the situation described by the user that could be automated, and name the \
kind of tooling or integration that would do it. Finish with 3 to 5 bullet points starting \
with \"- \", one automation opportunity per bullet.";

const GENERAL_SYSTEM: &str = "You are a helpful business consultant. Answer the user's \
question with practical business insight. Where it helps, finish with a few bullet points \
starting with \"- \".";

/// System prompt for an insight type
pub fn system_prompt(insight_type: InsightType) -> &'static str {
    match insight_type {
        InsightType::Analysis => ANALYSIS_SYSTEM,
        InsightType::Recommendation => RECOMMENDATION_SYSTEM,
        InsightType::Automation => AUTOMATION_SYSTEM,
        InsightType::General => GENERAL_SYSTEM,
    }
}

/// User prompt for a request, with context appended when present
pub fn user_prompt(request: &GenerationRequest) -> String {
    match request
        .context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        Some(context) => format!(
            "{}\n\nBusiness context:\n{}",
            request.prompt.trim(),
            context
        ),
        None => request.prompt.trim().to_string(),
    }
}
