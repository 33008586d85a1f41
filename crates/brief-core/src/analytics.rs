//! Summary statistics over a collection of insights
//!
//! Every field of [`AnalyticsSummary`] is an independent reduction over the
//! same input. The reference time is captured once per call so that trend
//! buckets and the recency window agree with each other.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Insight, InsightType, Priority};

/// Number of daily buckets in the weekly trend (index 6 is today)
pub const TREND_DAYS: usize = 7;

/// Number of categories reported in `top_categories`
pub const TOP_CATEGORY_LIMIT: usize = 5;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Dashboard statistics for a set of insights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_insights: usize,
    pub insights_by_type: BTreeMap<InsightType, usize>,
    pub average_confidence: f64,
    pub top_categories: Vec<String>,
    pub weekly_trend: [usize; TREND_DAYS],
    pub priority_distribution: BTreeMap<Priority, usize>,
    pub recent_activity: usize,
}

impl Default for AnalyticsSummary {
    fn default() -> Self {
        Self {
            total_insights: 0,
            insights_by_type: BTreeMap::new(),
            average_confidence: 0.0,
            top_categories: Vec::new(),
            weekly_trend: [0; TREND_DAYS],
            priority_distribution: BTreeMap::new(),
            recent_activity: 0,
        }
    }
}

/// Aggregate insights relative to the current time
pub fn aggregate(insights: &[Insight]) -> AnalyticsSummary {
    aggregate_at(insights, Utc::now())
}

/// Aggregate insights relative to a fixed reference time
pub fn aggregate_at(insights: &[Insight], now: DateTime<Utc>) -> AnalyticsSummary {
    if insights.is_empty() {
        return AnalyticsSummary::default();
    }

    let recent_cutoff = now - Duration::hours(24);

    let mut summary = AnalyticsSummary {
        total_insights: insights.len(),
        ..Default::default()
    };
    let mut confidence_sum = 0.0;
    let mut categories = CategoryCounter::default();

    for insight in insights {
        *summary
            .insights_by_type
            .entry(insight.insight_type)
            .or_insert(0) += 1;

        *summary
            .priority_distribution
            .entry(insight.priority_or_default())
            .or_insert(0) += 1;

        confidence_sum += insight.confidence_or_zero();
        categories.add(insight.category_or_default());

        if let Some(bucket) = trend_bucket(insight.timestamp, now) {
            summary.weekly_trend[bucket] += 1;
        }

        if insight.timestamp > recent_cutoff {
            summary.recent_activity += 1;
        }
    }

    summary.average_confidence = confidence_sum / insights.len() as f64;
    summary.top_categories = categories.top(TOP_CATEGORY_LIMIT);

    tracing::debug!(
        total = summary.total_insights,
        recent = summary.recent_activity,
        "Computed insight analytics"
    );

    summary
}

/// Trend bucket for a timestamp, or None when outside the last seven days
fn trend_bucket(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Option<usize> {
    let days_diff = (now - timestamp)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY);
    if (0..TREND_DAYS as i64).contains(&days_diff) {
        Some(TREND_DAYS - 1 - days_diff as usize)
    } else {
        None
    }
}

/// Category counts that remember first-seen order for stable ranking
#[derive(Default)]
struct CategoryCounter {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl CategoryCounter {
    fn add(&mut self, category: &str) {
        match self.index.get(category) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(category.to_string(), self.counts.len());
                self.counts.push((category.to_string(), 1));
            }
        }
    }

    fn top(mut self, limit: usize) -> Vec<String> {
        // sort_by is stable, so ties keep first-seen order
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
            .into_iter()
            .take(limit)
            .map(|(name, _)| name)
            .collect()
    }
}
