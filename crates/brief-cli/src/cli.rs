//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use brief_core::db::DEFAULT_DB_PATH;
use clap::{Parser, Subcommand};

/// Brief - Classified business insights from your LLM
#[derive(Parser)]
#[command(name = "brief")]
#[command(about = "Generate, classify and analyze business insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// AI backend config file (TOML)
    ///
    /// Defaults to ~/.config/brief/config.toml when present. Environment
    /// variables fill any field the file leaves out.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Generate an insight with the configured AI backend and store it
    Generate {
        /// Insight type: analysis, recommendation, automation, general
        #[arg(short = 't', long = "type", default_value = "general")]
        insight_type: String,

        /// Question or request for the model
        #[arg(short, long)]
        prompt: String,

        /// Business context appended to the prompt
        #[arg(short, long)]
        context: Option<String>,
    },

    /// List stored insights, newest first
    List {
        /// Only show this insight type
        #[arg(short = 't', long = "type")]
        insight_type: Option<String>,

        /// Number of insights to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show one insight
    Show {
        /// Insight id
        id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an insight
    Delete {
        /// Insight id
        id: String,
    },

    /// Classify text without generating or storing anything
    Classify {
        /// Text to classify
        text: String,

        /// Insight type whose category table to use
        #[arg(short = 't', long = "type", default_value = "general")]
        insight_type: String,
    },

    /// Show analytics over stored insights
    Stats,

    /// Export stored insights
    Export {
        /// Output format: csv or json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export this insight type
        #[arg(short = 't', long = "type")]
        insight_type: Option<String>,

        /// Read insights from a JSON array file instead of the database
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
