//! Sift CLI
//!
//! Main entry point for the sift command-line tool.
//! Turns PDF directories and JSON list documents into chunk records.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::{InspectCommand, JsonCommand, PdfCommand};
use sift_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Sift - extract, dedupe and chunk documents for retrieval
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(about = "Extract, dedupe and chunk documents for retrieval", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "SIFT_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "SIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Maximum chunk length in characters
    #[arg(long, global = true, env = "SIFT_CHUNK_SIZE")]
    chunk_size: Option<usize>,

    /// Characters shared between consecutive chunks
    #[arg(long, global = true, env = "SIFT_CHUNK_OVERLAP")]
    chunk_overlap: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chunk every PDF in a directory
    Pdf(PdfCommand),

    /// Chunk the lists of a JSON document
    Json(JsonCommand),

    /// Show what extraction sees on each page of a PDF
    Inspect(InspectCommand),
}

fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load configuration from the workspace and config file the flags name
    let config = AppConfig::load_from(cli.workspace, cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.chunk_size,
        cli.chunk_overlap,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    config.validate()?;

    tracing::info!("Sift CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!(
        "Chunking: size={} overlap={}",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let command_name = match &cli.command {
        Commands::Pdf(_) => "pdf",
        Commands::Json(_) => "json",
        Commands::Inspect(_) => "inspect",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Pdf(cmd) => cmd.execute(&config),
        Commands::Json(cmd) => cmd.execute(&config),
        Commands::Inspect(cmd) => cmd.execute(),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
