//! Insight database operations

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, ErrorCode, OptionalExtension, Row};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{parse_timestamp, Insight, InsightFilter, InsightType, Priority};

const INSIGHT_COLUMNS: &str = "id, insight_type, content, category, priority, confidence, \
                               suggestions, action_items, created_at";

impl Database {
    /// Store a new insight
    ///
    /// Fails with `InvalidData` if an insight with the same id exists.
    pub fn insert_insight(&self, insight: &Insight) -> Result<()> {
        let conn = self.conn()?;

        let suggestions = serde_json::to_string(&insight.suggestions)?;
        let action_items = serde_json::to_string(&insight.action_items)?;
        let created_at = insight
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let result = conn.execute(
            r#"
            INSERT INTO insights (
                id, insight_type, content, category, priority, confidence,
                suggestions, action_items, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                insight.id,
                insight.insight_type.as_str(),
                insight.content,
                insight.category,
                insight.priority.map(|p| p.as_str()),
                insight.confidence,
                suggestions,
                action_items,
                created_at
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(Error::InvalidData(format!(
                    "Insight {} already exists",
                    insight.id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get an insight by id
    pub fn get_insight(&self, id: &str) -> Result<Option<Insight>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM insights WHERE id = ?", INSIGHT_COLUMNS);

        let raw = conn
            .query_row(&sql, params![id], RawInsight::from_row)
            .optional()?;
        raw.map(RawInsight::into_insight).transpose()
    }

    /// List insights, newest first
    pub fn list_insights(&self, filter: &InsightFilter) -> Result<Vec<Insight>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM insights
            WHERE (?1 IS NULL OR insight_type = ?1)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
            INSIGHT_COLUMNS
        );

        // SQLite treats a negative LIMIT as "no limit"
        let limit = filter
            .limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![filter.insight_type.map(|t| t.as_str()), limit],
                RawInsight::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(RawInsight::into_insight).collect()
    }

    /// All stored insights, newest first
    pub fn all_insights(&self) -> Result<Vec<Insight>> {
        self.list_insights(&InsightFilter::default())
    }

    /// Delete an insight, returning whether a row was removed
    pub fn delete_insight(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM insights WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    /// Count stored insights
    pub fn count_insights(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM insights", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Columns as stored, before JSON and enum decoding
struct RawInsight {
    id: String,
    insight_type: String,
    content: String,
    category: Option<String>,
    priority: Option<String>,
    confidence: Option<f64>,
    suggestions: String,
    action_items: String,
    created_at: String,
}

impl RawInsight {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            insight_type: row.get(1)?,
            content: row.get(2)?,
            category: row.get(3)?,
            priority: row.get(4)?,
            confidence: row.get(5)?,
            suggestions: row.get(6)?,
            action_items: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_insight(self) -> Result<Insight> {
        let timestamp = parse_timestamp(&self.created_at).unwrap_or_else(|| {
            tracing::warn!(id = %self.id, created_at = %self.created_at, "Unparseable insight timestamp");
            Utc::now()
        });

        Ok(Insight {
            insight_type: InsightType::parse_lenient(&self.insight_type),
            priority: self.priority.and_then(|p| p.parse::<Priority>().ok()),
            suggestions: serde_json::from_str(&self.suggestions)?,
            action_items: serde_json::from_str(&self.action_items)?,
            id: self.id,
            timestamp,
            category: self.category,
            confidence: self.confidence,
            content: self.content,
        })
    }
}
