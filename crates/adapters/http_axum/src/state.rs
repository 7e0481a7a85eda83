//! Shared application state for axum handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tripmap_app::ports::{FileStore, MapRepository, MarkerRepository, MultimediaRepository};
use tripmap_app::services::map_service::MapService;
use tripmap_app::services::marker_service::MarkerService;
use tripmap_app::services::multimedia_service::MultimediaService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types and the file store to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`, only the `Arc` wrappers are cloned.
pub struct AppState<MR, KR, MMR, F> {
    /// Map CRUD service.
    pub map_service: Arc<MapService<MR>>,
    /// Marker CRUD service.
    pub marker_service: Arc<MarkerService<KR>>,
    /// Multimedia service, reading markers through its own repository handle.
    pub multimedia_service: Arc<MultimediaService<MMR, KR, F>>,
    /// Directory served read-only under `/uploads`.
    pub uploads_dir: Arc<PathBuf>,
}

impl<MR, KR, MMR, F> Clone for AppState<MR, KR, MMR, F> {
    fn clone(&self) -> Self {
        Self {
            map_service: Arc::clone(&self.map_service),
            marker_service: Arc::clone(&self.marker_service),
            multimedia_service: Arc::clone(&self.multimedia_service),
            uploads_dir: Arc::clone(&self.uploads_dir),
        }
    }
}

impl<MR, KR, MMR, F> AppState<MR, KR, MMR, F>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        map_service: MapService<MR>,
        marker_service: MarkerService<KR>,
        multimedia_service: MultimediaService<MMR, KR, F>,
        uploads_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            map_service: Arc::new(map_service),
            marker_service: Arc::new(marker_service),
            multimedia_service: Arc::new(multimedia_service),
            uploads_dir: Arc::new(uploads_dir.into()),
        }
    }
}
