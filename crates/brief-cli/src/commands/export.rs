//! Export command implementation

use std::path::Path;

use anyhow::{Context, Result};
use brief_core::db::Database;
use brief_core::export::{export_insights, insights_from_json, ExportFormat};
use brief_core::models::{Insight, InsightFilter};

use super::parse_type_arg;

pub fn cmd_export(
    db: &Database,
    format: &str,
    output: Option<&Path>,
    insight_type: Option<&str>,
) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
    let filter = InsightFilter {
        insight_type: parse_type_arg(insight_type)?,
        limit: None,
    };

    let insights = db.list_insights(&filter)?;
    write_export(&insights, format, output)
}

/// Export insights read from a JSON array file instead of the database
///
/// Accepts the output of `brief export --format json`, so a saved export
/// can be converted to CSV later.
pub fn cmd_export_from(
    input: &Path,
    format: &str,
    output: Option<&Path>,
    insight_type: Option<&str>,
) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
    let insight_type = parse_type_arg(insight_type)?;

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mut insights = insights_from_json(&text)
        .with_context(|| format!("Invalid insight file {}", input.display()))?;
    if let Some(insight_type) = insight_type {
        insights.retain(|i| i.insight_type == insight_type);
    }

    write_export(&insights, format, output)
}

fn write_export(insights: &[Insight], format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let document = export_insights(insights, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "✅ Exported {} insight(s) to {}",
                insights.len(),
                path.display()
            );
        }
        None => println!("{}", document),
    }

    Ok(())
}
