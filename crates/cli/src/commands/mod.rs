//! Command handlers for the sift CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod inspect;
pub mod json;
pub mod pdf;

// Re-export command types for convenience
pub use inspect::InspectCommand;
pub use json::JsonCommand;
pub use pdf::PdfCommand;
