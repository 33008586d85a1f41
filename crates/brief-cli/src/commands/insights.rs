//! Insight command implementations

use anyhow::{bail, Context, Result};
use brief_core::ai::{AIBackend, AIClient};
use brief_core::classify::classify;
use brief_core::config::AiConfig;
use brief_core::db::Database;
use brief_core::models::{GenerationRequest, Insight, InsightFilter, InsightType};
use brief_core::pipeline::InsightPipeline;
use brief_core::suggestions::extract_suggestions;

use super::{first_line, truncate};

/// Parse a type filter given on the command line
pub fn parse_type_arg(value: Option<&str>) -> Result<Option<InsightType>> {
    value
        .map(|s| s.parse::<InsightType>().map_err(anyhow::Error::msg))
        .transpose()
}

pub async fn cmd_generate(
    db: &Database,
    config: &AiConfig,
    insight_type: &str,
    prompt: &str,
    context: Option<&str>,
) -> Result<()> {
    let Some(ai) = AIClient::from_config(config)? else {
        bail!(
            "No AI backend configured. Set OLLAMA_HOST (or BRIEF_AI_BACKEND=openai_compatible \
             with OPENAI_COMPATIBLE_HOST), or pass --config"
        );
    };

    let insight_type = InsightType::parse_lenient(insight_type);
    let mut request = GenerationRequest::new(prompt, insight_type);
    if let Some(context) = context {
        request = request.with_context(context);
    }

    println!(
        "🤖 Generating {} insight with {} ({})...",
        insight_type,
        ai.model(),
        ai.kind()
    );

    let insight = InsightPipeline::from_config(config)
        .generate(&ai, &request)
        .await
        .context("Insight generation failed")?;
    db.insert_insight(&insight)
        .context("Failed to store insight")?;

    println!();
    print_insight(&insight);
    println!();
    println!("✅ Saved as {}", insight.id);

    Ok(())
}

pub fn cmd_list(db: &Database, insight_type: Option<&str>, limit: usize) -> Result<()> {
    let filter = InsightFilter {
        insight_type: parse_type_arg(insight_type)?,
        limit: Some(limit),
    };
    let insights = db.list_insights(&filter)?;

    if insights.is_empty() {
        println!("No insights yet. Run 'brief generate' to create one.");
        return Ok(());
    }

    println!(
        "{:<24} {:<16} {:<8} {:<26} Summary",
        "ID", "Time", "Priority", "Category"
    );
    println!("{}", "─".repeat(110));
    for insight in &insights {
        println!(
            "{:<24} {:<16} {:<8} {:<26} {}",
            insight.id,
            insight.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            insight.priority_or_default().as_str(),
            truncate(insight.category_or_default(), 26),
            truncate(first_line(&insight.content), 40)
        );
    }
    println!();
    println!("{} insight(s)", insights.len());

    Ok(())
}

pub fn cmd_show(db: &Database, id: &str, json: bool) -> Result<()> {
    let Some(insight) = db.get_insight(id)? else {
        bail!("Insight not found: {}", id);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&insight)?);
    } else {
        print_insight(&insight);
    }

    Ok(())
}

pub fn cmd_delete(db: &Database, id: &str) -> Result<()> {
    if !db.delete_insight(id)? {
        bail!("Insight not found: {}", id);
    }
    println!("🗑️  Deleted insight {}", id);
    Ok(())
}

pub fn cmd_classify(text: &str, insight_type: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Nothing to classify");
    }

    let insight_type = InsightType::parse_lenient(insight_type);
    let classification = classify(text, insight_type);
    let suggestions = extract_suggestions(text);

    println!("Type:     {}", insight_type);
    println!("Category: {}", classification.category);
    println!("Priority: {}", classification.priority);
    if !suggestions.is_empty() {
        println!("Suggestions:");
        for suggestion in &suggestions {
            println!("  • {}", suggestion);
        }
    }

    Ok(())
}

fn print_insight(insight: &Insight) {
    println!("📌 {} [{}]", insight.id, insight.insight_type);
    println!("   Time:       {}", insight.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("   Category:   {}", insight.category_or_default());
    println!("   Priority:   {}", insight.priority_or_default());
    println!(
        "   Confidence: {:.0}%",
        insight.confidence_or_zero() * 100.0
    );
    println!();
    for line in insight.content.lines() {
        println!("   {}", line);
    }
    if !insight.suggestions.is_empty() {
        println!();
        println!("   Suggestions:");
        for suggestion in &insight.suggestions {
            println!("   • {}", suggestion);
        }
    }
    if !insight.action_items.is_empty() {
        println!();
        println!("   Action items:");
        for item in &insight.action_items {
            println!("   ☐ {}", item);
        }
    }
}
