//! Error types for sift.
//!
//! One enum covers every failure category in the pipeline: configuration,
//! I/O, unreadable PDFs, malformed JSON input, page extraction and
//! serialization. Skipped content (empty or duplicate text) is not an error
//! and never shows up here.

use thiserror::Error;

/// Unified error type for sift.
///
/// Loaders catch per-file and per-page errors, log them and keep going.
/// Only configuration, directory listing and output failures reach the caller.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A PDF could not be opened or read
    #[error("File access error: {0}")]
    FileAccess(String),

    /// JSON input lacks the expected nested shape
    #[error("Structure error: {0}")]
    Structure(String),

    /// A page's content could not be decoded into layout blocks
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
