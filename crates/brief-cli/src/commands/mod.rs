//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, load_ai_config)
//! - `insights` - Insight commands (generate, list, show, delete, classify)
//! - `stats` - Analytics summary
//! - `export` - CSV/JSON export
//! - `serve` - Web server command

pub mod core;
pub mod export;
pub mod insights;
pub mod serve;
pub mod stats;

// Re-export command functions for main.rs
pub use core::*;
pub use export::*;
pub use insights::*;
pub use serve::*;
pub use stats::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// First line of a block of text
pub fn first_line(s: &str) -> &str {
    s.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}
