//! PDF corpus loader.
//!
//! Walks the PDF files directly inside a directory, extracts every page,
//! drops empty and repeated page texts and chunks the rest. A file that
//! cannot be opened is logged and skipped; so is a page that cannot be read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sift_core::{AppError, AppResult};
use walkdir::WalkDir;

use crate::chunker::Chunker;
use crate::extract::extract_page_text;
use crate::layout::PdfDocument;
use crate::progress::ProgressReporter;
use crate::run::Run;
use crate::types::{LoadReport, UnitMetadata};

/// File name suffix selecting PDF inputs (case-sensitive).
pub const PDF_EXTENSION: &str = ".pdf";

/// Load every PDF in `directory` and return the chunk records.
///
/// Only a directory that cannot be listed is returned as an error; per-file
/// and per-page failures end up in the report's failures and stats.
pub fn load_pdfs(
    directory: &Path,
    chunker: &Chunker,
    progress: &ProgressReporter,
) -> AppResult<LoadReport> {
    let files = discover_pdfs(directory)?;
    let total = files.len();

    progress.discover(total, &directory.display().to_string());
    tracing::info!("Found {} PDF files in {:?}", total, directory);

    let mut run = Run::new(chunker, progress);

    for (index, path) in files.iter().enumerate() {
        let filename = file_name(path);
        run.file_seen();
        run.progress().file(index, total, &filename);

        let before = run.chunks_so_far();
        match process_pdf(path, &filename, &mut run) {
            Ok(()) => {
                tracing::info!(
                    "Loaded and processed {} chunks from {}",
                    run.chunks_so_far() - before,
                    filename
                );
            }
            Err(e) => {
                tracing::warn!("Failed to process {}: {}", filename, e);
                run.file_failed(path, e.to_string());
            }
        }
    }

    let report = run.finish();

    tracing::info!(
        "PDF load completed: {} files ({} failed), {} pages kept, {} chunks in {:.2}s",
        report.stats.files_seen,
        report.stats.files_failed,
        report.stats.units_accepted,
        report.stats.chunks_count,
        report.stats.duration_secs
    );

    Ok(report)
}

/// List regular files directly in `directory` whose name ends with `.pdf`.
///
/// Sorted by file name so runs are reproducible. A path that is not a
/// directory is an error.
pub fn discover_pdfs(directory: &Path) -> AppResult<Vec<PathBuf>> {
    if !fs::metadata(directory)?.is_dir() {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{:?} is not a directory", directory),
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(AppError::Io(e.into()));
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {:?}: {}", directory, e);
                continue;
            }
        };

        let is_pdf = entry.file_name().to_string_lossy().ends_with(PDF_EXTENSION);
        if is_pdf && entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Extract, dedupe and chunk every page of one file.
///
/// The document is dropped, and its data released, when this returns.
fn process_pdf(path: &Path, filename: &str, run: &mut Run<'_>) -> AppResult<()> {
    let document = PdfDocument::open(path)?;
    let page_count = document.page_count();

    tracing::debug!("Opened {} ({} pages)", filename, page_count);

    for page_number in 0..page_count {
        let metadata = UnitMetadata::Page {
            page_number,
            source: filename.to_string(),
        };

        let layout = match document.page_layout(page_number) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!("Failed to read page {} of {}: {}", page_number, filename, e);
                run.page_failed(page_number, page_count, &metadata);
                continue;
            }
        };

        let text = extract_page_text(&layout.blocks);
        tracing::trace!("Page {} of {}: {} bytes of text", page_number, filename, text.len());

        run.offer(text, metadata, page_number, page_count);
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
