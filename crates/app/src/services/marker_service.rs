//! Marker service — use-cases for managing markers.

use tripmap_domain::error::{NotFoundError, TripMapError};
use tripmap_domain::id::MarkerId;
use tripmap_domain::marker::{Marker, MarkerDraft};
use tripmap_domain::pagination::{Page, PageRequest};

use crate::ports::MarkerRepository;

const ENTITY: &str = "Marker";

/// Application service for marker CRUD operations.
pub struct MarkerService<R> {
    repo: R,
}

impl<R: MarkerRepository> MarkerService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// One page of markers.
    ///
    /// Unlike maps and multimedia, an empty page is reported as not found.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when the page holds no markers,
    /// or a storage error from the repository.
    pub async fn list_markers(&self, page: PageRequest) -> Result<Page<Marker>, TripMapError> {
        let page = self.repo.list(page).await?;
        if page.items.is_empty() {
            return Err(NotFoundError::EmptyPage {
                collection: "markers",
            }
            .into());
        }
        Ok(page)
    }

    /// Look up a marker by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no marker with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_marker(&self, id: MarkerId) -> Result<Marker, TripMapError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError::record(ENTITY, id).into())
    }

    /// Insert a validated marker. The referenced map is not checked.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, draft), fields(marker_title = %draft.title))]
    pub async fn create_marker(&self, draft: MarkerDraft) -> Result<Marker, TripMapError> {
        let marker = self.repo.create(draft).await?;
        tracing::debug!(marker_id = %marker.id, map_id = %marker.map_id, "marker created");
        Ok(marker)
    }

    /// Update a marker, keeping the stored title when the new one is empty.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no marker with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_marker(&self, id: MarkerId, draft: MarkerDraft) -> Result<(), TripMapError> {
        let stored = self.get_marker(id).await?;
        let merged = draft.merged_with(&stored);
        if self.repo.update(id, merged).await? {
            Ok(())
        } else {
            Err(NotFoundError::record(ENTITY, id).into())
        }
    }

    /// Delete a marker. Attached multimedia is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no marker with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_marker(&self, id: MarkerId) -> Result<(), TripMapError> {
        self.get_marker(id).await?;
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(NotFoundError::record(ENTITY, id).into())
        }
    }
}
