//! Server command implementation

use std::path::Path;

use anyhow::Result;
use brief_server::ServerConfig;

use super::{load_ai_config, open_db};

/// Comma-separated CORS origins for the web API
const ALLOWED_ORIGINS_ENV: &str = "BRIEF_ALLOWED_ORIGINS";

/// Parse a comma-separated origin list
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub async fn cmd_serve(
    db_path: &Path,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
) -> Result<()> {
    println!("🚀 Starting Brief web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let db = open_db(db_path)?;
    let ai = load_ai_config(config_path)?;
    let allowed_origins = parse_origins(&std::env::var(ALLOWED_ORIGINS_ENV).unwrap_or_default());

    if ai.is_configured() {
        println!(
            "   AI backend: {} {}",
            ai.backend,
            ai.host.as_deref().unwrap_or("")
        );
    } else {
        println!("   AI backend: not configured (generation disabled)");
    }
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    if host != "127.0.0.1" && host != "localhost" {
        println!();
        println!("   ⚠️  No authentication - do not expose to an untrusted network!");
    }
    println!();

    let config = ServerConfig {
        allowed_origins,
        ai,
    };
    brief_server::serve_with_config(db, host, port, config).await
}
