//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`TripMapError`]
//! via `From`, so services only ever return one error type.

use std::error::Error;

/// Top-level error returned by every application service.
#[derive(Debug, thiserror::Error)]
pub enum TripMapError {
    /// Input was malformed, missing, or out of range.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The database or the filesystem failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn Error + Send + Sync>),
}

/// A record lookup that came back empty.
#[derive(Debug, thiserror::Error)]
pub enum NotFoundError {
    /// No record of kind `entity` with the given id.
    #[error("{entity} not found")]
    Record {
        entity: &'static str,
        id: String,
    },

    /// A listing whose requested page holds no rows.
    #[error("No {collection} found")]
    EmptyPage { collection: &'static str },
}

impl NotFoundError {
    /// Shorthand for [`NotFoundError::Record`].
    #[must_use]
    pub fn record(entity: &'static str, id: impl ToString) -> Self {
        Self::Record {
            entity,
            id: id.to_string(),
        }
    }
}

/// Reasons a request can be rejected before touching storage.
///
/// The `Display` text is returned verbatim to API clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: {0}")]
    MissingFields(&'static str),

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{field} must be less than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Privacy must be 'public' or 'private'")]
    InvalidPrivacy,

    #[error("Invalid type. Must be one of: 'photo_file', 'video_file', 'text_note', 'audio_note'")]
    InvalidMediaType,

    #[error("{0} must be a valid positive number")]
    InvalidId(&'static str),

    #[error("Latitude and longitude must be valid numbers")]
    InvalidCoordinates,

    #[error("Invalid ID format. ID must be a number.")]
    InvalidPathId,

    #[error("Invalid or missing idMarker")]
    InvalidMarkerReference,

    #[error("Notes cannot be empty")]
    EmptyNotes,

    #[error("No files uploaded")]
    NoFiles,

    #[error("Too many files. At most {max} files can be uploaded at once")]
    TooManyFiles { max: usize },

    #[error("Invalid file type. Only images, videos, and audio files are allowed.")]
    UnsupportedFileType,

    #[error("File too large. The maximum size is {max_bytes} bytes")]
    FileTooLarge { max_bytes: u64 },

    /// The request body could not be decoded at all.
    #[error("Malformed request: {0}")]
    Malformed(String),
}
