//! Export functionality for insights
//!
//! Supports:
//! - CSV export of a collection (one always-quoted row per insight)
//! - JSON export of a single insight or a collection
//! - Strict parsing of JSON collections handed in for export

use std::str::FromStr;

use chrono::SecondsFormat;

use crate::error::{Error, Result};
use crate::models::{Insight, UNCATEGORIZED};

/// Returned instead of a CSV document when there is nothing to export
pub const EMPTY_EXPORT_MESSAGE: &str = "No insights to export";

/// Content longer than this many characters is truncated in CSV rows
pub const CSV_CONTENT_LIMIT: usize = 500;

const CSV_HEADER: [&str; 8] = [
    "Timestamp",
    "Type",
    "Category",
    "Priority",
    "Confidence",
    "Content",
    "Suggestions",
    "Action Items",
];

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown export format: {} (use csv or json)", s)),
        }
    }
}

/// Render insights as CSV
///
/// An empty collection yields [`EMPTY_EXPORT_MESSAGE`] rather than a
/// header-only document.
pub fn export_insights_csv(insights: &[Insight]) -> Result<String> {
    if insights.is_empty() {
        return Ok(EMPTY_EXPORT_MESSAGE.to_string());
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for insight in insights {
        writer.write_record(csv_row(insight))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Serialization(format!("Failed to flush CSV writer: {}", e)))?;
    let mut out = String::from_utf8(bytes)
        .map_err(|e| Error::Serialization(format!("CSV output is not UTF-8: {}", e)))?;

    // rows are joined with newlines, not terminated by one
    if out.ends_with('\n') {
        out.pop();
    }

    tracing::debug!(rows = insights.len(), "Exported insights to CSV");
    Ok(out)
}

/// Render a single insight as pretty-printed JSON
pub fn export_insight_json(insight: &Insight) -> Result<String> {
    Ok(serde_json::to_string_pretty(insight)?)
}

/// Render a collection of insights as a pretty-printed JSON array
pub fn export_insights_json(insights: &[Insight]) -> Result<String> {
    Ok(serde_json::to_string_pretty(insights)?)
}

/// Render insights in the requested format
pub fn export_insights(insights: &[Insight], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => export_insights_csv(insights),
        ExportFormat::Json => export_insights_json(insights),
    }
}

/// Parse a JSON document that must be an array of insights
pub fn insights_from_json(text: &str) -> Result<Vec<Insight>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| Error::Serialization(format!("Invalid JSON: {}", e)))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(Error::Serialization(format!(
                "Expected an array of insights, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::Serialization(format!("Insight at index {}: {}", i, e)))
        })
        .collect()
}

/// File name for a single-insight JSON download
pub fn insight_file_name(insight: &Insight) -> String {
    format!("insight-{}.json", insight.id)
}

fn csv_row(insight: &Insight) -> [String; 8] {
    [
        insight
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        insight.insight_type.to_string(),
        insight
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        insight.priority_or_default().to_string(),
        format!("{}%", (insight.confidence_or_zero() * 100.0).round() as i64),
        truncate_content(&insight.content),
        join_or_none(&insight.suggestions),
        join_or_none(&insight.action_items),
    ]
}

fn truncate_content(content: &str) -> String {
    if content.chars().count() > CSV_CONTENT_LIMIT {
        let head: String = content.chars().take(CSV_CONTENT_LIMIT).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join("; ")
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp, InsightType, Priority};

    fn sample() -> Insight {
        Insight {
            id: "1768473000000-abc123xyz".to_string(),
            timestamp: parse_timestamp("2026-01-15T10:30:00Z").unwrap(),
            insight_type: InsightType::Analysis,
            category: Some("Financial Performance".to_string()),
            priority: Some(Priority::High),
            confidence: Some(0.854),
            content: "Margins are \"thin\" this quarter".to_string(),
            suggestions: vec![
                "Renegotiate supplier terms".to_string(),
                "Review pricing tiers".to_string(),
            ],
            action_items: vec![],
        }
    }

    #[test]
    fn test_export_empty() {
        assert_eq!(export_insights_csv(&[]).unwrap(), "No insights to export");
    }

    #[test]
    fn test_export_csv_row() {
        let csv = export_insights_csv(&[sample()]).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#""Timestamp","Type","Category","Priority","Confidence","Content","Suggestions","Action Items""#
        );
        assert_eq!(
            lines[1],
            r#""2026-01-15T10:30:00.000Z","analysis","Financial Performance","high","85%","Margins are ""thin"" this quarter","Renegotiate supplier terms; Review pricing tiers","None""#
        );
    }

    #[test]
    fn test_export_csv_defaults() {
        let mut insight = sample();
        insight.category = None;
        insight.priority = None;
        insight.confidence = None;
        insight.suggestions.clear();
        insight.insight_type = InsightType::General;

        let csv = export_insights_csv(&[insight]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert!(row.contains(r#""general","Uncategorized","medium","0%""#));
        assert!(row.ends_with(r#""None","None""#));
    }

    #[test]
    fn test_content_truncation_boundary() {
        let mut insight = sample();
        insight.content = "a".repeat(500);
        let csv = export_insights_csv(&[insight.clone()]).unwrap();
        assert!(csv.contains(&format!("\"{}\"", "a".repeat(500))));

        insight.content = "b".repeat(501);
        let csv = export_insights_csv(&[insight]).unwrap();
        assert!(csv.contains(&format!("\"{}...\"", "b".repeat(500))));
        assert!(!csv.contains(&"b".repeat(501)));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let content = "é".repeat(600);
        let truncated = truncate_content(&content);
        assert_eq!(truncated.chars().count(), 503);
    }

    #[test]
    fn test_export_insight_json_fields() {
        let json = export_insight_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["id"], "1768473000000-abc123xyz");
        assert_eq!(value["type"], "analysis");
        assert_eq!(value["category"], "Financial Performance");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["suggestions"].as_array().unwrap().len(), 2);
        assert!(value["actionItems"].as_array().unwrap().is_empty());
        assert!(value["timestamp"].as_str().unwrap().starts_with("2026-01-15T10:30:00"));
    }

    #[test]
    fn test_insights_from_json_rejects_non_array() {
        let err = insights_from_json(r#"{"id": "1"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("an object"));

        assert!(matches!(
            insights_from_json("not json").unwrap_err(),
            Error::Serialization(_)
        ));
    }

    #[test]
    fn test_insights_from_json_reports_bad_element() {
        let text = r#"[{"id": "1", "timestamp": "2026-01-15", "content": "ok"}, {"id": "2"}]"#;
        let err = insights_from_json(text).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_json_collection_parses_back() {
        let json = export_insights_json(&[sample()]).unwrap();
        let parsed = insights_from_json(&json).unwrap();
        assert_eq!(parsed, vec![sample()]);
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
