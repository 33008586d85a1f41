//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_ai_config` - Resolve AI backend configuration
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use brief_core::config::AiConfig;
use brief_core::db::Database;

/// Open (or create) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Resolve AI configuration from an explicit file, the default file, or env
pub fn load_ai_config(config_path: Option<&Path>) -> Result<AiConfig> {
    AiConfig::resolve(config_path).context("Failed to load AI configuration")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let count = db.count_insights()?;
    if count > 0 {
        println!("   Existing database with {} insight(s)", count);
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Point Brief at a model: export OLLAMA_HOST=http://localhost:11434");
    println!("  2. Generate an insight: brief generate --type analysis --prompt \"How did Q3 go?\"");
    println!("  3. Start web API: brief serve");

    Ok(())
}
