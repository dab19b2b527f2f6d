//! Ingestion type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata attached to a document unit and copied onto each of its chunks.
///
/// Serializes without a tag, so a PDF page becomes
/// `{"page_number": 0, "source": "guide.pdf"}` and a JSON list entry becomes
/// `{"document_number": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitMetadata {
    /// One page of a PDF file
    Page {
        /// 0-based page index
        page_number: usize,
        /// File name of the PDF, without its directory
        source: String,
    },

    /// One entry of a JSON `lists` array
    Document {
        /// Index in the source list
        document_number: usize,
    },
}

impl UnitMetadata {
    /// Short label used in log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Page {
                page_number,
                source,
            } => format!("page {} of {}", page_number, source),
            Self::Document { document_number } => format!("document {}", document_number),
        }
    }
}

/// A text unit prior to chunking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUnit {
    pub text: String,
    pub metadata: UnitMetadata,
}

impl DocumentUnit {
    pub fn new(text: impl Into<String>, metadata: UnitMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A bounded-length text segment, the pipeline's output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text content
    pub text: String,

    /// Metadata inherited unchanged from the parent unit
    pub metadata: UnitMetadata,

    /// Chunk position within its unit (0-indexed)
    pub position: u32,

    /// SHA-256 hash of the chunk text
    pub hash: String,
}

/// A file the PDF loader could not process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    /// Path of the failing file
    pub path: PathBuf,

    /// Error description
    pub reason: String,
}

/// Statistics from one loader run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    /// Number of input files considered
    pub files_seen: u32,

    /// Number of files that failed to open or process
    pub files_failed: u32,

    /// Units that passed deduplication and were chunked
    pub units_accepted: u32,

    /// Units skipped because they carried no text
    pub units_empty: u32,

    /// Units skipped because their text was already seen
    pub units_duplicate: u32,

    /// Pages that could not be read
    pub pages_failed: u32,

    /// Number of chunks produced
    pub chunks_count: u32,

    /// Duration in seconds
    pub duration_secs: f64,
}

/// Everything a loader run produced.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Chunk records in traversal order
    pub chunks: Vec<Chunk>,

    /// Run statistics
    pub stats: LoadStats,

    /// Files that were skipped because of an error
    pub failures: Vec<FileFailure>,
}
