//! Tubely Core Library
//!
//! This crate provides the domain model, error types, configuration, and content
//! validation shared by the storage, database, and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ThumbnailStorage};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
pub use validation::{validate_media_type, ContentError, UploadKind, ValidatedMedia};
