//! Content-type validation for uploaded parts.
//!
//! Decides whether a declared media type is acceptable for an upload kind and derives
//! the canonical file extension from the accepted type's subtype.

use std::fmt::{Display, Formatter, Result as FmtResult};

use mime::Mime;
use thiserror::Error;

/// Media types accepted for thumbnails.
pub const THUMBNAIL_MEDIA_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Media types accepted for videos.
pub const VIDEO_MEDIA_TYPES: &[&str] = &["video/mp4"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Malformed media type '{0}'")]
    MalformedMediaType(String),

    #[error("Media type '{media_type}' is not supported for {kind} uploads, allowed: {allowed:?}")]
    UnsupportedMediaType {
        media_type: String,
        kind: UploadKind,
        allowed: &'static [&'static str],
    },
}

/// What is being uploaded. Selects the accept list, the form field and the URL field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Thumbnail,
    Video,
}

impl UploadKind {
    pub fn allowed_media_types(self) -> &'static [&'static str] {
        match self {
            UploadKind::Thumbnail => THUMBNAIL_MEDIA_TYPES,
            UploadKind::Video => VIDEO_MEDIA_TYPES,
        }
    }

    /// Multipart field carrying the file.
    pub fn form_field(self) -> &'static str {
        match self {
            UploadKind::Thumbnail => "thumbnail",
            UploadKind::Video => "video",
        }
    }
}

impl Display for UploadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadKind::Thumbnail => write!(f, "thumbnail"),
            UploadKind::Video => write!(f, "video"),
        }
    }
}

/// Accepted media type without parameters, and the extension derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMedia {
    pub media_type: String,
    pub extension: String,
}

/// Validate a declared media type for an upload kind.
///
/// Parameters such as `charset` are discarded before comparison. The extension is the
/// lowercased subtype of the accepted type (`image/png` -> `png`).
pub fn validate_media_type(
    declared: &str,
    kind: UploadKind,
) -> Result<ValidatedMedia, ContentError> {
    let parsed: Mime = declared
        .trim()
        .parse()
        .map_err(|_| ContentError::MalformedMediaType(declared.to_string()))?;

    // `mime` accepts an empty subtype ("image/").
    if parsed.type_().as_str().is_empty() || parsed.subtype().as_str().is_empty() {
        return Err(ContentError::MalformedMediaType(declared.to_string()));
    }

    let media_type = parsed.essence_str().to_ascii_lowercase();
    let allowed = kind.allowed_media_types();

    if !allowed.contains(&media_type.as_str()) {
        return Err(ContentError::UnsupportedMediaType {
            media_type,
            kind,
            allowed,
        });
    }

    Ok(ValidatedMedia {
        extension: parsed.subtype().as_str().to_ascii_lowercase(),
        media_type,
    })
}
