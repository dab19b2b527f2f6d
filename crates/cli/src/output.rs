//! Chunk record output and terminal progress.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use sift_core::AppResult;
use sift_ingest::{Chunk, LoadReport, ProgressEvent, ProgressReporter};

/// Reporter printing one line per event on stderr, or nothing when `quiet`.
pub fn progress_reporter(quiet: bool) -> ProgressReporter {
    if quiet {
        return ProgressReporter::noop();
    }

    ProgressReporter::new(Arc::new(|event: ProgressEvent| {
        eprintln!("{}", event.format_simple());
    }))
}

/// Write chunks as JSON Lines to `path`, or to stdout when `None`.
pub fn write_chunks(chunks: &[Chunk], path: Option<&Path>) -> AppResult<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            write_jsonl(chunks, BufWriter::new(file))?;
            tracing::info!("Wrote {} chunks to {:?}", chunks.len(), path);
        }
        None => {
            let stdout = io::stdout();
            write_jsonl(chunks, BufWriter::new(stdout.lock()))?;
        }
    }

    Ok(())
}

fn write_jsonl<W: Write>(chunks: &[Chunk], mut writer: W) -> AppResult<()> {
    for chunk in chunks {
        serde_json::to_writer(&mut writer, chunk)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Log the run summary and each recorded failure.
pub fn log_report(report: &LoadReport) {
    for failure in &report.failures {
        tracing::warn!("Skipped {:?}: {}", failure.path, failure.reason);
    }

    tracing::info!(
        files_seen = report.stats.files_seen,
        files_failed = report.stats.files_failed,
        units_accepted = report.stats.units_accepted,
        units_empty = report.stats.units_empty,
        units_duplicate = report.stats.units_duplicate,
        pages_failed = report.stats.pages_failed,
        chunks = report.stats.chunks_count,
        duration_secs = report.stats.duration_secs,
        "Run complete"
    );
}
