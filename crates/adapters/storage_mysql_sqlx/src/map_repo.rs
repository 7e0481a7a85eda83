//! `MySQL` implementation of [`MapRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySqlPool, Row};

use tripmap_app::ports::MapRepository;
use tripmap_domain::error::TripMapError;
use tripmap_domain::id::{MapId, UserId};
use tripmap_domain::map::{Map, MapDraft, Privacy};
use tripmap_domain::pagination::{Page, PageRequest};

use crate::error::StorageError;
use crate::generated_key;

/// Wrapper for converting database rows into domain [`Map`].
struct Wrapper(Map);

impl<'r> FromRow<'r, MySqlRow> for Wrapper {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let privacy: String = row.try_get("privacy")?;
        let privacy =
            Privacy::from_str(&privacy).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Map {
            id: MapId::new(row.try_get("idMap")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            privacy,
            user_id: UserId::new(row.try_get("idUser")?),
        }))
    }
}

const INSERT: &str = "INSERT INTO maps (name, description, privacy, idUser) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM maps WHERE idMap = ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM maps";
const SELECT_PAGE: &str = "SELECT * FROM maps ORDER BY idMap ASC LIMIT ? OFFSET ?";
const EXISTS: &str = "SELECT 1 FROM maps WHERE idMap = ?";
const UPDATE: &str =
    "UPDATE maps SET name = ?, description = ?, privacy = ?, idUser = ? WHERE idMap = ?";
const DELETE_BY_ID: &str = "DELETE FROM maps WHERE idMap = ?";

/// `MySQL`-backed map repository.
#[derive(Clone)]
pub struct MysqlMapRepository {
    pool: MySqlPool,
}

impl MysqlMapRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl MapRepository for MysqlMapRepository {
    fn create(&self, draft: MapDraft) -> impl Future<Output = Result<Map, TripMapError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let result = sqlx::query(INSERT)
                .bind(&draft.name)
                .bind(&draft.description)
                .bind(draft.privacy.as_str())
                .bind(draft.user_id.get())
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            let id = MapId::new(generated_key(result.last_insert_id())?);
            Ok(draft.into_map(id))
        }
    }

    fn get_by_id(
        &self,
        id: MapId,
    ) -> impl Future<Output = Result<Option<Map>, TripMapError>> + Send {
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
    ) -> impl Future<Output = Result<Page<Map>, TripMapError>> + Send {
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
        id: MapId,
        draft: MapDraft,
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
                .bind(&draft.name)
                .bind(&draft.description)
                .bind(draft.privacy.as_str())
                .bind(draft.user_id.get())
                .bind(id.get())
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(true)
        }
    }

    fn delete(&self, id: MapId) -> impl Future<Output = Result<bool, TripMapError>> + Send {
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
