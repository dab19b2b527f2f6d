//! JSON command handler.

use clap::Args;
use sift_core::{config::AppConfig, AppResult};
use sift_ingest::{load_json, Chunker};
use std::path::PathBuf;

use crate::output;

/// Chunk the lists of a JSON document
#[derive(Args, Debug)]
pub struct JsonCommand {
    /// JSON file with a `main_page.content.lists` array
    pub file: PathBuf,

    /// Write records to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl JsonCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing json command for {:?}", self.file);

        let chunker = Chunker::new(config.chunking)?;
        let progress = output::progress_reporter(self.quiet);

        // Read and structure errors are in the report, not the result
        let report = load_json(&self.file, &chunker, &progress);

        output::log_report(&report);
        output::write_chunks(&report.chunks, self.output.as_deref())
    }
}
