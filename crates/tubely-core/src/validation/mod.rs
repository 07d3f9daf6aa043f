//! Validation modules

pub mod media;

pub use media::{validate_media_type, ContentError, UploadKind, ValidatedMedia};
