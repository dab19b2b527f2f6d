//! PDF command handler.
//!
//! Chunks every PDF in a directory and writes the records as JSON Lines.

use clap::Args;
use sift_core::{config::AppConfig, AppResult};
use sift_ingest::{load_pdfs, Chunker};
use std::path::PathBuf;

use crate::output;

/// Chunk every PDF in a directory
#[derive(Args, Debug)]
pub struct PdfCommand {
    /// Directory holding the PDF files (not searched recursively)
    pub directory: PathBuf,

    /// Write records to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl PdfCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing pdf command for {:?}", self.directory);

        let chunker = Chunker::new(config.chunking)?;
        let progress = output::progress_reporter(self.quiet);

        let report = load_pdfs(&self.directory, &chunker, &progress)?;

        output::log_report(&report);
        output::write_chunks(&report.chunks, self.output.as_deref())
    }
}
