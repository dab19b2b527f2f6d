//! JSON corpus loader.
//!
//! Expects `{"main_page": {"content": {"lists": [["text", ...], ...]}}}`.
//! Each inner list is joined with single spaces into one unit numbered by its
//! index. Failures are logged and whatever was loaded before them is kept.

use std::fs;
use std::path::Path;

use serde_json::Value;
use sift_core::{AppError, AppResult};

use crate::chunker::Chunker;
use crate::progress::ProgressReporter;
use crate::run::Run;
use crate::types::{LoadReport, UnitMetadata};

/// Load one JSON file and return the chunk records.
///
/// Never fails: read, parse and structure errors are logged and recorded in
/// the report, which keeps any chunks produced before the error.
pub fn load_json(path: &Path, chunker: &Chunker, progress: &ProgressReporter) -> LoadReport {
    let mut run = Run::new(chunker, progress);
    run.file_seen();
    run.progress().file(0, 1, &path.display().to_string());

    match load_lists(path, &mut run) {
        Ok(()) => {
            tracing::info!(
                "Loaded and processed {} chunks from {:?}",
                run.chunks_so_far(),
                path
            );
        }
        Err(e) => {
            tracing::warn!("Failed to process {:?}: {}", path, e);
            run.file_failed(path, e.to_string());
        }
    }

    run.finish()
}

fn load_lists(path: &Path, run: &mut Run<'_>) -> AppResult<()> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::FileAccess(format!("Failed to read {:?}: {}", path, e)))?;
    let data: Value = serde_json::from_str(&raw)?;

    let content = data
        .get("main_page")
        .and_then(|page| page.get("content"))
        .ok_or_else(|| {
            AppError::Structure(
                "JSON file does not contain expected 'main_page' -> 'content' structure"
                    .to_string(),
            )
        })?;

    let Some(lists) = content.as_object().and_then(|c| c.get("lists")) else {
        tracing::info!("No 'lists' under 'main_page.content' in {:?}", path);
        return Ok(());
    };

    let lists = lists
        .as_array()
        .ok_or_else(|| AppError::Structure("'lists' must be an array".to_string()))?;

    let total = lists.len();
    for (document_number, entry) in lists.iter().enumerate() {
        let full_text = join_entry(entry).ok_or_else(|| {
            AppError::Structure(format!(
                "entry {} of 'lists' is not an array of strings",
                document_number
            ))
        })?;

        run.offer(
            full_text,
            UnitMetadata::Document { document_number },
            document_number,
            total,
        );
    }

    Ok(())
}

/// Join an array of strings with single spaces and trim the result.
fn join_entry(entry: &Value) -> Option<String> {
    let parts = entry
        .as_array()?
        .iter()
        .map(Value::as_str)
        .collect::<Option<Vec<&str>>>()?;

    Some(parts.join(" ").trim().to_string())
}
