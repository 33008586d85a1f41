//! Keyword classifier for generated insights
//!
//! Assigns a priority and a category to insight text. Matching is plain
//! case-insensitive substring search; there is no stemming or tokenization.
//!
//! Priority rules are evaluated in order: any high-priority keyword wins,
//! then any low-priority keyword, otherwise medium.
//!
//! Categories are scored per insight type. Each type has four keyword rows
//! and a default. The row with the strictly greatest number of matching
//! keywords wins; no matches or a tie at the top yields the default.

use serde::{Deserialize, Serialize};

use crate::models::{InsightType, Priority};

/// Keywords that mark an insight as high priority
pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
    "urgent",
    "critical",
    "immediate",
    "crisis",
    "risk",
    "emergency",
    "failure",
    "loss",
];

/// Keywords that mark an insight as low priority
pub const LOW_PRIORITY_KEYWORDS: &[&str] = &[
    "maintain",
    "monitor",
    "consider",
    "explore",
    "optional",
    "eventually",
    "when possible",
];

/// Category keyword table for one insight type
#[derive(Debug)]
pub struct CategoryTable {
    pub default: &'static str,
    pub categories: [(&'static str, &'static [&'static str]); 4],
}

static ANALYSIS: CategoryTable = CategoryTable {
    default: "Business Analysis",
    categories: [
        (
            "Financial Performance",
            &[
                "revenue",
                "profit",
                "cost",
                "budget",
                "cash flow",
                "margin",
                "expense",
                "financial",
            ],
        ),
        (
            "Market Analysis",
            &[
                "market",
                "competitor",
                "competition",
                "industry",
                "demand",
                "pricing",
                "market share",
                "segment",
            ],
        ),
        (
            "Operational Efficiency",
            &[
                "operational",
                "efficiency",
                "productivity",
                "bottleneck",
                "utilization",
                "throughput",
                "downtime",
            ],
        ),
        (
            "Customer Analytics",
            &[
                "customer",
                "retention",
                "churn",
                "satisfaction",
                "acquisition",
                "engagement",
                "loyalty",
            ],
        ),
    ],
};

static RECOMMENDATION: CategoryTable = CategoryTable {
    default: "Strategic Recommendation",
    categories: [
        (
            "Strategic Planning",
            &[
                "strategy",
                "strategic",
                "roadmap",
                "vision",
                "objective",
                "long-term",
                "priorities",
            ],
        ),
        (
            "Process Improvement",
            &[
                "improve",
                "improvement",
                "streamline",
                "refine",
                "quality",
                "standardize",
                "best practice",
            ],
        ),
        (
            "Resource Allocation",
            &[
                "resource",
                "allocate",
                "allocation",
                "staffing",
                "hiring",
                "investment",
                "capacity",
            ],
        ),
        (
            "Growth Strategy",
            &[
                "growth",
                "expand",
                "expansion",
                "scale",
                "new market",
                "opportunity",
                "partnership",
            ],
        ),
    ],
};

static AUTOMATION: CategoryTable = CategoryTable {
    default: "Process Automation",
    categories: [
        (
            "Workflow Optimization",
            &[
                "workflow",
                "handoff",
                "approval",
                "routing",
                "pipeline",
                "orchestration",
            ],
        ),
        (
            "Technology Integration",
            &[
                "integrate",
                "integration",
                "api",
                "software",
                "platform",
                "crm",
                "erp",
            ],
        ),
        (
            "Process Automation",
            &[
                "automate",
                "automation",
                "automated",
                "script",
                "bot",
                "trigger",
                "scheduled",
            ],
        ),
        (
            "Efficiency Enhancement",
            &[
                "efficiency",
                "time saving",
                "save time",
                "manual",
                "faster",
                "reduce effort",
            ],
        ),
    ],
};

static GENERAL: CategoryTable = CategoryTable {
    default: "General Business",
    categories: [
        (
            "General Business",
            &["business", "company", "organization", "brand"],
        ),
        (
            "Operations",
            &[
                "operations",
                "logistics",
                "supply",
                "inventory",
                "delivery",
                "vendor",
            ],
        ),
        (
            "Planning",
            &[
                "plan",
                "planning",
                "forecast",
                "goal",
                "timeline",
                "milestone",
            ],
        ),
        (
            "Management",
            &[
                "manage",
                "management",
                "team",
                "leadership",
                "employee",
                "staff",
            ],
        ),
    ],
};

/// Category table for an insight type
pub fn category_table(insight_type: InsightType) -> &'static CategoryTable {
    match insight_type {
        InsightType::Analysis => &ANALYSIS,
        InsightType::Recommendation => &RECOMMENDATION,
        InsightType::Automation => &AUTOMATION,
        InsightType::General => &GENERAL,
    }
}

/// Result of classifying a piece of insight text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub priority: Priority,
}

/// Classify insight text for the given type
pub fn classify(content: &str, insight_type: InsightType) -> Classification {
    let lower = content.to_lowercase();
    Classification {
        category: categorize_lower(&lower, insight_type).to_string(),
        priority: prioritize_lower(&lower),
    }
}

/// Classify with a type name, using the general rules for unknown names
pub fn classify_str(content: &str, insight_type: &str) -> Classification {
    classify(content, InsightType::parse_lenient(insight_type))
}

/// Priority of insight text
pub fn prioritize(content: &str) -> Priority {
    prioritize_lower(&content.to_lowercase())
}

/// Category of insight text for the given type
pub fn categorize(content: &str, insight_type: InsightType) -> &'static str {
    categorize_lower(&content.to_lowercase(), insight_type)
}

fn prioritize_lower(lower: &str) -> Priority {
    if HIGH_PRIORITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Priority::High
    } else if LOW_PRIORITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

fn categorize_lower(lower: &str, insight_type: InsightType) -> &'static str {
    let table = category_table(insight_type);

    let mut best: Option<&'static str> = None;
    let mut best_score = 0usize;
    let mut tied = false;

    for (name, keywords) in &table.categories {
        let score = keywords.iter().filter(|k| lower.contains(*k)).count();
        if score > best_score {
            best = Some(*name);
            best_score = score;
            tied = false;
        } else if score == best_score && score > 0 {
            tied = true;
        }
    }

    match best {
        Some(name) if !tied => name,
        _ => table.default,
    }
}
