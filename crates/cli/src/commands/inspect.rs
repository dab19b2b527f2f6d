//! Inspect command handler.
//!
//! Prints the page text extraction produces, or the raw layout blocks it
//! works from, so a surprising chunk can be traced back to its page.

use clap::Args;
use sift_core::{AppError, AppResult};
use sift_ingest::{extract_page_text, PdfDocument};
use std::path::PathBuf;

/// Show what extraction sees on each page of a PDF
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// PDF file to inspect
    pub file: PathBuf,

    /// Only this page (0-based)
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Print layout blocks as JSON instead of extracted text
    #[arg(long)]
    pub layout: bool,
}

impl InspectCommand {
    pub fn execute(&self) -> AppResult<()> {
        tracing::info!("Executing inspect command for {:?}", self.file);

        let document = PdfDocument::open(&self.file)?;
        let page_count = document.page_count();

        let pages: Vec<usize> = match self.page {
            Some(page) if page >= page_count => {
                return Err(AppError::Other(format!(
                    "Page {} out of range, {:?} has {} pages",
                    page, self.file, page_count
                )));
            }
            Some(page) => vec![page],
            None => (0..page_count).collect(),
        };

        for page_number in pages {
            let layout = match document.page_layout(page_number) {
                Ok(layout) => layout,
                Err(e) => {
                    tracing::warn!("Failed to read page {}: {}", page_number, e);
                    continue;
                }
            };

            if self.layout {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                println!("--- page {} ---", page_number);
                println!("{}", extract_page_text(&layout.blocks));
            }
        }

        Ok(())
    }
}
