//! Sift Core Library
//!
//! This crate provides the foundational utilities shared by the sift crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management, including chunking settings

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ChunkingConfig};
pub use error::{AppError, AppResult};
