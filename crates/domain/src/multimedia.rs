//! Multimedia — photos, videos, audio notes and text notes attached to a marker.
//!
//! File-backed entries carry the on-disk location relative to the server's
//! storage root (`uploads/photos/...`). Text notes only carry `notes`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TripMapError, ValidationError};
use crate::id::{MarkerId, MultimediaId};
use crate::input::{self, NumberInput};
use crate::time::Timestamp;

/// Largest accepted upload, per file.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Most files accepted by a single upload request.
pub const MAX_FILES_PER_UPLOAD: usize = 10;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
];
pub const ALLOWED_VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/x-msvideo",
    "video/webm",
];
pub const ALLOWED_AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/webm",
    "audio/ogg",
];

/// Whether `mimetype` is on the upload allow-list.
#[must_use]
pub fn is_allowed_mime(mimetype: &str) -> bool {
    ALLOWED_IMAGE_TYPES
        .iter()
        .chain(ALLOWED_VIDEO_TYPES)
        .chain(ALLOWED_AUDIO_TYPES)
        .any(|allowed| *allowed == mimetype)
}

/// Kind of attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    PhotoFile,
    VideoFile,
    TextNote,
    AudioNote,
}

impl MediaType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PhotoFile => "photo_file",
            Self::VideoFile => "video_file",
            Self::TextNote => "text_note",
            Self::AudioNote => "audio_note",
        }
    }

    /// Classify an uploaded file by its declared content type.
    ///
    /// Unrecognized families default to [`MediaType::PhotoFile`].
    #[must_use]
    pub fn from_mime(mimetype: &str) -> Self {
        if mimetype.starts_with("video/") {
            Self::VideoFile
        } else if mimetype.starts_with("audio/") {
            Self::AudioNote
        } else {
            Self::PhotoFile
        }
    }

    /// Sub-directory of the uploads root holding files of this kind.
    #[must_use]
    pub fn directory(self) -> Option<&'static str> {
        match self {
            Self::PhotoFile => Some("photos"),
            Self::VideoFile => Some("videos"),
            Self::AudioNote => Some("audio"),
            Self::TextNote => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo_file" => Ok(Self::PhotoFile),
            "video_file" => Ok(Self::VideoFile),
            "text_note" => Ok(Self::TextNote),
            "audio_note" => Ok(Self::AudioNote),
            _ => Err(ValidationError::InvalidMediaType),
        }
    }
}

/// A stored multimedia entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Multimedia {
    #[serde(rename = "idMultimedia")]
    pub id: MultimediaId,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(rename = "idMarker")]
    pub marker_id: MarkerId,
    pub filename: Option<String>,
    pub filepath: Option<String>,
    pub mimetype: Option<String>,
    pub filesize: Option<i64>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// A row about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMultimedia {
    pub media_type: MediaType,
    pub marker_id: MarkerId,
    pub filename: Option<String>,
    pub filepath: Option<String>,
    pub mimetype: Option<String>,
    pub filesize: Option<i64>,
    pub notes: Option<String>,
}

impl NewMultimedia {
    /// A text note for `marker_id`.
    #[must_use]
    pub fn note(marker_id: MarkerId, notes: String) -> Self {
        Self {
            media_type: MediaType::TextNote,
            marker_id,
            filename: None,
            filepath: None,
            mimetype: None,
            filesize: None,
            notes: Some(notes),
        }
    }

    /// Validate the fields of the generic creation path.
    ///
    /// Blank notes are stored as `NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::Validation`] when `type` or `idMarker` is
    /// missing, the type is unknown, or the marker id is not a positive integer.
    pub fn generic(
        media_type: Option<String>,
        marker_id: Option<NumberInput>,
        notes: Option<String>,
    ) -> Result<Self, TripMapError> {
        let media_type = media_type.filter(|s| !s.is_empty());
        let marker_id = input::present(marker_id);
        let (Some(media_type), Some(marker_id)) = (media_type, marker_id) else {
            return Err(ValidationError::MissingFields("type, idMarker").into());
        };

        let media_type = MediaType::from_str(&media_type)?;
        let marker_id = MarkerId::new(input::positive_id(&marker_id, "idMarker")?);

        Ok(Self {
            media_type,
            marker_id,
            filename: None,
            filepath: None,
            mimetype: None,
            filesize: None,
            notes: notes.filter(|s| !s.is_empty()),
        })
    }

    /// Attach the storage-assigned id and creation time.
    #[must_use]
    pub fn into_multimedia(self, id: MultimediaId, created_at: Timestamp) -> Multimedia {
        Multimedia {
            id,
            media_type: self.media_type,
            marker_id: self.marker_id,
            filename: self.filename,
            filepath: self.filepath,
            mimetype: self.mimetype,
            filesize: self.filesize,
            notes: self.notes,
            created_at,
        }
    }
}

/// Parse the marker reference of the upload and note paths.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidMarkerReference`] when the value is
/// absent, blank, or not a positive integer.
pub fn marker_reference(raw: Option<NumberInput>) -> Result<MarkerId, ValidationError> {
    input::present(raw)
        .and_then(|raw| input::positive_id(&raw, "idMarker").ok())
        .map(MarkerId::new)
        .ok_or(ValidationError::InvalidMarkerReference)
}

/// Validate note text: must contain something other than whitespace.
///
/// The text is returned untouched.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyNotes`] for absent or blank notes.
pub fn note_text(raw: Option<String>) -> Result<String, ValidationError> {
    raw.filter(|s| !s.trim().is_empty())
        .ok_or(ValidationError::EmptyNotes)
}

/// A file received from a client, fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Name as sent by the client.
    pub original_name: String,
    /// Declared content type.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl FileUpload {
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        MediaType::from_mime(&self.content_type)
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Check the content type allow-list and the size cap.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedFileType`] or
    /// [`ValidationError::FileTooLarge`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_allowed_mime(&self.content_type) {
            return Err(ValidationError::UnsupportedFileType);
        }
        if self.size() > MAX_FILE_SIZE {
            return Err(ValidationError::FileTooLarge {
                max_bytes: MAX_FILE_SIZE,
            });
        }
        Ok(())
    }
}

/// Validate a whole batch before anything is written.
///
/// # Errors
///
/// Returns [`ValidationError::NoFiles`], [`ValidationError::TooManyFiles`],
/// or the first per-file error.
pub fn validate_batch(files: &[FileUpload]) -> Result<(), ValidationError> {
    if files.is_empty() {
        return Err(ValidationError::NoFiles);
    }
    if files.len() > MAX_FILES_PER_UPLOAD {
        return Err(ValidationError::TooManyFiles {
            max: MAX_FILES_PER_UPLOAD,
        });
    }
    files.iter().try_for_each(FileUpload::validate)
}

/// Partial update of a multimedia entry. Only notes can change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesUpdate {
    /// `None` keeps the stored notes; `Some(None)` clears them; `Some(Some(_))`
    /// replaces them.
    pub notes: Option<Option<String>>,
}

impl NotesUpdate {
    /// Notes to store given the currently stored value.
    #[must_use]
    pub fn apply(self, stored: Option<String>) -> Option<String> {
        match self.notes {
            Some(notes) => notes,
            None => stored,
        }
    }
}
