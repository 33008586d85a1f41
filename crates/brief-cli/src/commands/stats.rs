//! Analytics summary command

use anyhow::Result;
use brief_core::analytics::{aggregate, TREND_DAYS};
use brief_core::db::Database;

/// Width of the longest trend bar
const BAR_WIDTH: usize = 30;

pub fn cmd_stats(db: &Database) -> Result<()> {
    let insights = db.all_insights()?;
    let summary = aggregate(&insights);

    println!("📊 Insight Analytics");
    println!("   ─────────────────────────────");
    println!("   Total insights:     {}", summary.total_insights);
    println!("   Last 24 hours:      {}", summary.recent_activity);
    println!(
        "   Average confidence: {:.0}%",
        summary.average_confidence * 100.0
    );

    if summary.total_insights == 0 {
        println!();
        println!("No insights yet. Run 'brief generate' to create one.");
        return Ok(());
    }

    println!();
    println!("   By type:");
    for (insight_type, count) in &summary.insights_by_type {
        println!("     {:<16} {}", insight_type.as_str(), count);
    }

    println!();
    println!("   By priority:");
    for (priority, count) in summary.priority_distribution.iter().rev() {
        println!("     {:<16} {}", priority.as_str(), count);
    }

    println!();
    println!("   Top categories:");
    for (rank, category) in summary.top_categories.iter().enumerate() {
        println!("     {}. {}", rank + 1, category);
    }

    println!();
    println!("   Last {} days (oldest first):", TREND_DAYS);
    let max = summary.weekly_trend.iter().copied().max().unwrap_or(0).max(1);
    for (i, count) in summary.weekly_trend.iter().enumerate() {
        let days_ago = TREND_DAYS - 1 - i;
        let label = match days_ago {
            0 => "today".to_string(),
            1 => "yesterday".to_string(),
            n => format!("{} days ago", n),
        };
        let bar = "█".repeat(count * BAR_WIDTH / max);
        println!("     {:<11} {:>3} {}", label, count, bar);
    }

    Ok(())
}
