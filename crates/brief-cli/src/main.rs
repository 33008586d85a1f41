//! Brief CLI - Business insight generator and analyzer
//!
//! Usage:
//!   brief init                                   Initialize database
//!   brief generate --type analysis --prompt "…"  Generate and store an insight
//!   brief stats                                  Show analytics
//!   brief serve --port 3000                      Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Generate {
            insight_type,
            prompt,
            context,
        } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_ai_config(cli.config.as_deref())?;
            commands::cmd_generate(&db, &config, &insight_type, &prompt, context.as_deref()).await
        }
        Commands::List {
            insight_type,
            limit,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(&db, insight_type.as_deref(), limit)
        }
        Commands::Show { id, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_show(&db, &id, json)
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_delete(&db, &id)
        }
        Commands::Classify { text, insight_type } => commands::cmd_classify(&text, &insight_type),
        Commands::Stats => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_stats(&db)
        }
        Commands::Export {
            format,
            output,
            insight_type,
            from,
        } => match from {
            Some(input) => commands::cmd_export_from(
                &input,
                &format,
                output.as_deref(),
                insight_type.as_deref(),
            ),
            None => {
                let db = commands::open_db(&cli.db)?;
                commands::cmd_export(&db, &format, output.as_deref(), insight_type.as_deref())
            }
        },
        Commands::Serve { port, host } => {
            commands::cmd_serve(&cli.db, cli.config.as_deref(), &host, port).await
        }
    }
}
