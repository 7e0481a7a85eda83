//! Storage-specific error type wrapping sqlx errors.

use tripmap_domain::error::TripMapError;

/// Errors originating from the `MySQL` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// The database handed back a key that does not fit the domain id type.
    #[error("generated key {0} is out of range")]
    KeyOutOfRange(u64),
}

impl From<StorageError> for TripMapError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
