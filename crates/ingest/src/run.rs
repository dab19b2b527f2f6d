//! State owned by one loader invocation.

use std::path::Path;
use std::time::Instant;

use crate::chunker::Chunker;
use crate::dedupe::{Admission, UniqueContentSet};
use crate::progress::{ProgressReporter, UnitOutcome};
use crate::types::{DocumentUnit, FileFailure, LoadReport, UnitMetadata};

/// Dedupe set and output accumulator for a single loader call.
pub(crate) struct Run<'a> {
    chunker: &'a Chunker,
    progress: &'a ProgressReporter,
    unique: UniqueContentSet,
    report: LoadReport,
    started: Instant,
}

impl<'a> Run<'a> {
    pub(crate) fn new(chunker: &'a Chunker, progress: &'a ProgressReporter) -> Self {
        Self {
            chunker,
            progress,
            unique: UniqueContentSet::new(),
            report: LoadReport::default(),
            started: Instant::now(),
        }
    }

    /// Dedupe a unit's text and chunk it when it is new.
    ///
    /// `index` and `total` place the unit within its file for progress.
    pub(crate) fn offer(
        &mut self,
        text: String,
        metadata: UnitMetadata,
        index: usize,
        total: usize,
    ) {
        let label = metadata.describe();

        let outcome = match self.unique.admit(&text) {
            Admission::Accepted => {
                let unit = DocumentUnit::new(text, metadata);
                let chunks = self.chunker.split(&unit);
                let produced = chunks.len();

                self.report.stats.units_accepted += 1;
                self.report.chunks.extend(chunks);
                UnitOutcome::Chunked(produced)
            }
            Admission::Empty => {
                self.report.stats.units_empty += 1;
                tracing::info!("No text extracted from {}", label);
                UnitOutcome::Empty
            }
            Admission::Duplicate => {
                self.report.stats.units_duplicate += 1;
                tracing::info!("Duplicate text in {}, skipping", label);
                UnitOutcome::Duplicate
            }
        };

        self.progress.unit(index, total, &label, outcome);
    }

    pub(crate) fn file_seen(&mut self) {
        self.report.stats.files_seen += 1;
    }

    pub(crate) fn page_failed(&mut self, index: usize, total: usize, metadata: &UnitMetadata) {
        self.report.stats.pages_failed += 1;
        self.progress
            .unit(index, total, &metadata.describe(), UnitOutcome::Unreadable);
    }

    pub(crate) fn file_failed(&mut self, path: &Path, reason: String) {
        self.report.stats.files_failed += 1;
        self.report.failures.push(FileFailure {
            path: path.to_path_buf(),
            reason,
        });
    }

    pub(crate) fn chunks_so_far(&self) -> usize {
        self.report.chunks.len()
    }

    pub(crate) fn progress(&self) -> &ProgressReporter {
        self.progress
    }

    pub(crate) fn finish(mut self) -> LoadReport {
        self.report.stats.chunks_count = self.report.chunks.len() as u32;
        self.report.stats.duration_secs = self.started.elapsed().as_secs_f64();
        self.report
    }
}
