//! Map service — use-cases for managing maps.

use tripmap_domain::error::{NotFoundError, TripMapError};
use tripmap_domain::id::MapId;
use tripmap_domain::map::{Map, MapDraft};
use tripmap_domain::pagination::{Page, PageRequest};

use crate::ports::MapRepository;

const ENTITY: &str = "Map";

/// Application service for map CRUD operations.
pub struct MapService<R> {
    repo: R,
}

impl<R: MapRepository> MapService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// One page of maps. A page past the end is empty, not an error.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_maps(&self, page: PageRequest) -> Result<Page<Map>, TripMapError> {
        self.repo.list(page).await
    }

    /// Look up a map by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no map with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_map(&self, id: MapId) -> Result<Map, TripMapError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError::record(ENTITY, id).into())
    }

    /// Insert a validated map.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, draft), fields(map_name = %draft.name))]
    pub async fn create_map(&self, draft: MapDraft) -> Result<Map, TripMapError> {
        let map = self.repo.create(draft).await?;
        tracing::debug!(map_id = %map.id, "map created");
        Ok(map)
    }

    /// Replace every field of an existing map.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no map with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_map(&self, id: MapId, draft: MapDraft) -> Result<(), TripMapError> {
        if self.repo.update(id, draft).await? {
            Ok(())
        } else {
            Err(NotFoundError::record(ENTITY, id).into())
        }
    }

    /// Delete a map. Markers referencing it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no map with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_map(&self, id: MapId) -> Result<(), TripMapError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(NotFoundError::record(ENTITY, id).into())
        }
    }
}
