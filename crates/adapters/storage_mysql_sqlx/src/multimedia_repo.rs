//! `MySQL` implementation of [`MultimediaRepository`].

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySqlPool, Row};

use tripmap_app::ports::MultimediaRepository;
use tripmap_domain::error::TripMapError;
use tripmap_domain::id::{MarkerId, MultimediaId};
use tripmap_domain::multimedia::{MediaType, Multimedia, NewMultimedia};
use tripmap_domain::pagination::{Page, PageRequest};

use crate::error::StorageError;
use crate::generated_key;

/// Wrapper for converting database rows into domain [`Multimedia`].
struct Wrapper(Multimedia);

impl<'r> FromRow<'r, MySqlRow> for Wrapper {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let media_type: String = row.try_get("type")?;
        let media_type =
            MediaType::from_str(&media_type).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        Ok(Self(Multimedia {
            id: MultimediaId::new(row.try_get("idMultimedia")?),
            media_type,
            marker_id: MarkerId::new(row.try_get("idMarker")?),
            filename: row.try_get("filename")?,
            filepath: row.try_get("filepath")?,
            mimetype: row.try_get("mimetype")?,
            filesize: row.try_get("filesize")?,
            notes: row.try_get("notes")?,
            created_at,
        }))
    }
}

const INSERT: &str = "INSERT INTO multimedia \
    (type, idMarker, filename, filepath, mimetype, filesize, notes) \
    VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM multimedia WHERE idMultimedia = ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM multimedia";
const SELECT_PAGE: &str = "SELECT * FROM multimedia \
    ORDER BY created_at DESC, idMultimedia DESC LIMIT ? OFFSET ?";
const SELECT_BY_MARKER: &str = "SELECT * FROM multimedia WHERE idMarker = ? \
    ORDER BY created_at DESC, idMultimedia DESC";
const EXISTS: &str = "SELECT 1 FROM multimedia WHERE idMultimedia = ?";
const UPDATE_NOTES: &str = "UPDATE multimedia SET notes = ? WHERE idMultimedia = ?";
const DELETE_BY_ID: &str = "DELETE FROM multimedia WHERE idMultimedia = ?";

/// `MySQL`-backed multimedia repository.
#[derive(Clone)]
pub struct MysqlMultimediaRepository {
    pool: MySqlPool,
}

impl MysqlMultimediaRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl MultimediaRepository for MysqlMultimediaRepository {
    fn create(
        &self,
        entry: NewMultimedia,
    ) -> impl Future<Output = Result<Multimedia, TripMapError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let result = sqlx::query(INSERT)
                .bind(entry.media_type.as_str())
                .bind(entry.marker_id.get())
                .bind(&entry.filename)
                .bind(&entry.filepath)
                .bind(&entry.mimetype)
                .bind(entry.filesize)
                .bind(&entry.notes)
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;
            let id = generated_key(result.last_insert_id())?;

            // created_at is assigned by the server
            let row: Wrapper = sqlx::query_as(SELECT_BY_ID)
                .bind(id)
                .fetch_one(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(row.0)
        }
    }

    fn get_by_id(
        &self,
        id: MultimediaId,
    ) -> impl Future<Output = Result<Option<Multimedia>, TripMapError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Multimedia>, TripMapError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let total: i64 = sqlx::query_scalar(COUNT_ALL)
                .fetch_one(&mut *conn)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PAGE)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            let items = rows.into_iter().map(|w| w.0).collect();
            Ok(Page::new(items, total.unsigned_abs(), page))
        }
    }

    fn find_by_marker(
        &self,
        marker_id: MarkerId,
    ) -> impl Future<Output = Result<Vec<Multimedia>, TripMapError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_MARKER)
                .bind(marker_id.get())
                .fetch_all(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update_notes(
        &self,
        id: MultimediaId,
        notes: Option<String>,
    ) -> impl Future<Output = Result<bool, TripMapError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let exists = sqlx::query(EXISTS)
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(StorageError::from)?
                .is_some();
            if !exists {
                return Ok(false);
            }

            sqlx::query(UPDATE_NOTES)
                .bind(&notes)
                .bind(id.get())
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(true)
        }
    }

    fn delete(
        &self,
        id: MultimediaId,
    ) -> impl Future<Output = Result<bool, TripMapError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.get())
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }
}
