//! # tripmap-adapter-files-local
//!
//! Local filesystem implementation of the [`FileStore`] port.
//!
//! Uploaded files land under `<base_dir>/uploads/<kind>/` where `<kind>` is
//! one of `photos`, `videos` or `audio`. Stored names follow
//! `<original-stem>-<unix-millis>-<random>.<original-ext>` so two uploads of
//! the same file never collide. Paths handed back to callers are relative to
//! `base_dir` and always use `/`.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use tripmap_app::ports::FileStore;
use tripmap_domain::error::TripMapError;
use tripmap_domain::multimedia::FileUpload;
use tripmap_domain::time;

/// Top-level directory under the base directory holding every upload.
pub const UPLOADS_DIR: &str = "uploads";

/// Sub-directories created at startup.
pub const UPLOAD_SUBDIRS: [&str; 4] = ["photos", "videos", "audio", "thumbnails"];

/// Errors originating from the local file store.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// The path would resolve outside the uploads directory.
    #[error("invalid upload path: {0}")]
    InvalidPath(String),
}

impl From<FileStoreError> for TripMapError {
    fn from(err: FileStoreError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Stores uploads on the local disk.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    base_dir: PathBuf,
}

impl LocalFileStore {
    /// Create the upload directory tree under `base_dir` if missing.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Io`] if a directory cannot be created.
    pub async fn initialize(base_dir: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let base_dir = base_dir.into();
        for sub in UPLOAD_SUBDIRS {
            fs::create_dir_all(base_dir.join(UPLOADS_DIR).join(sub)).await?;
        }
        tracing::info!(path = %base_dir.join(UPLOADS_DIR).display(), "upload directories ready");
        Ok(Self { base_dir })
    }

    /// Absolute (or base-relative) location of the `uploads` directory.
    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.base_dir.join(UPLOADS_DIR)
    }

    /// Resolve a stored relative path, refusing anything that escapes
    /// `uploads/`.
    fn resolve(&self, filepath: &str) -> Result<PathBuf, FileStoreError> {
        let relative = Path::new(filepath);
        let inside = relative.starts_with(UPLOADS_DIR)
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !inside {
            return Err(FileStoreError::InvalidPath(filepath.to_string()));
        }
        Ok(self.base_dir.join(relative))
    }
}

/// Build the unique stored name for an upload.
fn unique_name(original_name: &str, millis: i64, random: u32) -> String {
    // browsers may send a full client-side path
    let file_name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("file");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{millis}-{random}.{ext}"),
        None => format!("{stem}-{millis}-{random}"),
    }
}

fn random_suffix() -> u32 {
    let value = Uuid::new_v4().as_u128() % 1_000_000_000;
    u32::try_from(value).unwrap_or_default()
}

impl FileStore for LocalFileStore {
    fn save(
        &self,
        upload: &FileUpload,
    ) -> impl Future<Output = Result<String, TripMapError>> + Send {
        let dir = upload.media_type().directory().unwrap_or("photos");
        let name = unique_name(
            &upload.original_name,
            time::now().timestamp_millis(),
            random_suffix(),
        );
        let relative = format!("{UPLOADS_DIR}/{dir}/{name}");
        let target = self.base_dir.join(UPLOADS_DIR).join(dir).join(&name);
        async move {
            fs::write(&target, &upload.data)
                .await
                .map_err(FileStoreError::from)?;
            tracing::debug!(path = %relative, size = upload.data.len(), "upload stored");
            Ok(relative)
        }
    }

    fn remove(&self, filepath: &str) -> impl Future<Output = Result<(), TripMapError>> + Send {
        let target = self.resolve(filepath);
        async move {
            let target = target?;
            match fs::remove_file(&target).await {
                Ok(()) => {
                    tracing::debug!(path = %target.display(), "upload removed");
                    Ok(())
                }
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(FileStoreError::from(err).into()),
            }
        }
    }
}
