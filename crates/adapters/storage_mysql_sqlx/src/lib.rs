//! # tripmap-adapter-storage-mysql-sqlx
//!
//! `MySQL` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `tripmap-app::ports::storage`
//! - Manage the `MySQL` connection pool lifecycle
//! - Optionally bootstrap the schema from `schema.sql`
//! - Map between domain types and database rows
//!
//! Every repository call acquires its own pooled connection and hands it back
//! when the call returns, whatever the outcome.
//!
//! ## Dependency rule
//! Depends on `tripmap-app` (for port traits) and `tripmap-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod map_repo;
mod marker_repo;
mod multimedia_repo;
mod pool;

pub use error::StorageError;
pub use map_repo::MysqlMapRepository;
pub use marker_repo::MysqlMarkerRepository;
pub use multimedia_repo::MysqlMultimediaRepository;
pub use pool::{Config, Database, SCHEMA};

/// Convert an `AUTO_INCREMENT` key into the signed id domain types use.
fn generated_key(raw: u64) -> Result<i64, StorageError> {
    i64::try_from(raw).map_err(|_| StorageError::KeyOutOfRange(raw))
}
