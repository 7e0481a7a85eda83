//! File store port — where uploaded media bytes live.

use std::future::Future;

use tripmap_domain::error::TripMapError;
use tripmap_domain::multimedia::FileUpload;

/// Persists uploaded files and removes them again.
///
/// Paths handed out and accepted are relative to the store root, use `/` as
/// separator, and start with `uploads/`.
pub trait FileStore {
    /// Write an upload under a fresh unique name in the directory matching
    /// its media type. Returns the relative path.
    fn save(&self, upload: &FileUpload) -> impl Future<Output = Result<String, TripMapError>> + Send;

    /// Remove a previously saved file. A file that is already gone is not an
    /// error.
    fn remove(&self, filepath: &str) -> impl Future<Output = Result<(), TripMapError>> + Send;
}

impl<T: FileStore + Send + Sync> FileStore for std::sync::Arc<T> {
    fn save(&self, upload: &FileUpload) -> impl Future<Output = Result<String, TripMapError>> + Send {
        (**self).save(upload)
    }

    fn remove(&self, filepath: &str) -> impl Future<Output = Result<(), TripMapError>> + Send {
        (**self).remove(filepath)
    }
}
