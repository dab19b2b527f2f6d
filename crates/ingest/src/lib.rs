//! Document ingestion for retrieval pipelines.
//!
//! Extracts text from PDF pages (prose, code-like blocks and tables) and from
//! JSON list documents, drops exact duplicates within a run, and splits what
//! remains into overlapping chunks ready for an embedding stage.

pub mod chunker;
pub mod dedupe;
pub mod extract;
pub mod json;
pub mod layout;
pub mod pdf;
pub mod progress;
pub mod types;

mod run;

// Re-export commonly used types
pub use chunker::Chunker;
pub use extract::extract_page_text;
pub use json::load_json;
pub use layout::{LayoutBlock, PageLayout, PdfDocument, Rect};
pub use pdf::load_pdfs;
pub use progress::{Phase, ProgressEvent, ProgressReporter, UnitOutcome};
pub use types::{Chunk, DocumentUnit, FileFailure, LoadReport, LoadStats, UnitMetadata};
