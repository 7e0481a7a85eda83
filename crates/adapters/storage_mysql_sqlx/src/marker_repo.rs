//! `MySQL` implementation of [`MarkerRepository`].

use std::future::Future;

use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySqlPool, Row};

use tripmap_app::ports::MarkerRepository;
use tripmap_domain::error::TripMapError;
use tripmap_domain::id::{MapId, MarkerId};
use tripmap_domain::marker::{Marker, MarkerDraft};
use tripmap_domain::pagination::{Page, PageRequest};

use crate::error::StorageError;
use crate::generated_key;

struct Wrapper(Marker);

impl<'r> FromRow<'r, MySqlRow> for Wrapper {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Marker {
            id: MarkerId::new(row.try_get("idMarker")?),
            title: row.try_get("title")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            map_id: MapId::new(row.try_get("idMap")?),
        }))
    }
}

const INSERT: &str = "INSERT INTO markers (title, latitude, longitude, idMap) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM markers WHERE idMarker = ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM markers";
const SELECT_PAGE: &str = "SELECT * FROM markers ORDER BY idMarker ASC LIMIT ? OFFSET ?";
const EXISTS: &str = "SELECT 1 FROM markers WHERE idMarker = ?";
const UPDATE: &str =
    "UPDATE markers SET title = ?, latitude = ?, longitude = ?, idMap = ? WHERE idMarker = ?";
const DELETE_BY_ID: &str = "DELETE FROM markers WHERE idMarker = ?";

/// `MySQL`-backed marker repository.
#[derive(Clone)]
pub struct MysqlMarkerRepository {
    pool: MySqlPool,
}

impl MysqlMarkerRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl MarkerRepository for MysqlMarkerRepository {
    fn create(
        &self,
        draft: MarkerDraft,
    ) -> impl Future<Output = Result<Marker, TripMapError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let result = sqlx::query(INSERT)
                .bind(&draft.title)
                .bind(draft.latitude)
                .bind(draft.longitude)
                .bind(draft.map_id.get())
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            let id = MarkerId::new(generated_key(result.last_insert_id())?);
            Ok(draft.into_marker(id))
        }
    }

    fn get_by_id(
        &self,
        id: MarkerId,
    ) -> impl Future<Output = Result<Option<Marker>, TripMapError>> + Send {
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
    ) -> impl Future<Output = Result<Page<Marker>, TripMapError>> + Send {
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

    fn update(
        &self,
        id: MarkerId,
        draft: MarkerDraft,
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

            sqlx::query(UPDATE)
                .bind(&draft.title)
                .bind(draft.latitude)
                .bind(draft.longitude)
                .bind(draft.map_id.get())
                .bind(id.get())
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(true)
        }
    }

    fn delete(&self, id: MarkerId) -> impl Future<Output = Result<bool, TripMapError>> + Send {
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
