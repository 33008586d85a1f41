//! Domain models for Brief
//!
//! `Insight` is the central record. Derived fields (`category`, `priority`)
//! are optional on the type because records loaded from storage or imported
//! from JSON may lack them; the pipeline always fills them in.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Intent of a generation request
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Analysis,
    Recommendation,
    Automation,
    #[default]
    General,
}

impl InsightType {
    pub const ALL: [InsightType; 4] = [
        InsightType::Analysis,
        InsightType::Recommendation,
        InsightType::Automation,
        InsightType::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Analysis => "analysis",
            InsightType::Recommendation => "recommendation",
            InsightType::Automation => "automation",
            InsightType::General => "general",
        }
    }

    /// Parse a type name, falling back to `General` for anything unrecognized
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::debug!(insight_type = s, "Unknown insight type, using general");
            InsightType::General
        })
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analysis" => Ok(InsightType::Analysis),
            "recommendation" => Ok(InsightType::Recommendation),
            "automation" => Ok(InsightType::Automation),
            "general" => Ok(InsightType::General),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Urgency tier of an insight
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Category label used when an insight carries none
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A generated, classified unit of business text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_insight_type"
    )]
    pub insight_type: InsightType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub content: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
}

impl Insight {
    /// Category, or "Uncategorized" when missing
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Priority, or medium when missing
    pub fn priority_or_default(&self) -> Priority {
        self.priority.unwrap_or_default()
    }

    /// Confidence, or 0 when missing
    pub fn confidence_or_zero(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }
}

/// A request to the text-generation backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(rename = "type", default)]
    pub insight_type: InsightType,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, insight_type: InsightType) -> Self {
        Self {
            prompt: prompt.into(),
            context: None,
            insight_type,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Raw output of the text-generation backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub content: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub action_items: Vec<String>,
}

/// Filter for listing stored insights
#[derive(Debug, Clone, Default)]
pub struct InsightFilter {
    pub insight_type: Option<InsightType>,
    pub limit: Option<usize>,
}

/// Parse a timestamp from any of the forms storage may hand back
///
/// Accepts RFC 3339 (`2026-01-15T10:30:00.000Z`), SQLite datetime
/// (`2026-01-15 10:30:00`) and bare dates (`2026-01-15`).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(s) => parse_timestamp(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
        RawTimestamp::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", ms))),
    }
}

fn deserialize_insight_type<'de, D>(deserializer: D) -> Result<InsightType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(InsightType::parse_lenient)
        .unwrap_or_default())
}
