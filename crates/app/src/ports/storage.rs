//! Storage port — repository traits for persistence.
//!
//! Implementations acquire their own connection per call and must release it
//! on every exit path.

use std::future::Future;

use tripmap_domain::error::TripMapError;
use tripmap_domain::id::{MapId, MarkerId, MultimediaId};
use tripmap_domain::map::{Map, MapDraft};
use tripmap_domain::marker::{Marker, MarkerDraft};
use tripmap_domain::multimedia::{Multimedia, NewMultimedia};
use tripmap_domain::pagination::{Page, PageRequest};

/// Repository for persisting and querying [`Map`]s.
pub trait MapRepository {
    /// Insert a new map and return it with its generated id.
    fn create(&self, draft: MapDraft) -> impl Future<Output = Result<Map, TripMapError>> + Send;

    /// Get a map by its identifier.
    fn get_by_id(&self, id: MapId)
    -> impl Future<Output = Result<Option<Map>, TripMapError>> + Send;

    /// Count all maps and return the requested page, ordered by id.
    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Map>, TripMapError>> + Send;

    /// Replace every field of a map. Returns `false` when no row matched.
    fn update(
        &self,
        id: MapId,
        draft: MapDraft,
    ) -> impl Future<Output = Result<bool, TripMapError>> + Send;

    /// Delete a map. Returns `false` when no row matched.
    fn delete(&self, id: MapId) -> impl Future<Output = Result<bool, TripMapError>> + Send;
}

/// Repository for persisting and querying [`Marker`]s.
pub trait MarkerRepository {
    /// Insert a new marker and return it with its generated id.
    fn create(
        &self,
        draft: MarkerDraft,
    ) -> impl Future<Output = Result<Marker, TripMapError>> + Send;

    /// Get a marker by its identifier.
    fn get_by_id(
        &self,
        id: MarkerId,
    ) -> impl Future<Output = Result<Option<Marker>, TripMapError>> + Send;

    /// Count all markers and return the requested page, ordered by id.
    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Marker>, TripMapError>> + Send;

    /// Replace every field of a marker. Returns `false` when no row matched.
    fn update(
        &self,
        id: MarkerId,
        draft: MarkerDraft,
    ) -> impl Future<Output = Result<bool, TripMapError>> + Send;

    /// Delete a marker. Returns `false` when no row matched.
    fn delete(&self, id: MarkerId) -> impl Future<Output = Result<bool, TripMapError>> + Send;
}

/// Repository for persisting and querying [`Multimedia`] entries.
pub trait MultimediaRepository {
    /// Insert a new entry and return it with its generated id and timestamp.
    fn create(
        &self,
        entry: NewMultimedia,
    ) -> impl Future<Output = Result<Multimedia, TripMapError>> + Send;

    /// Get an entry by its identifier.
    fn get_by_id(
        &self,
        id: MultimediaId,
    ) -> impl Future<Output = Result<Option<Multimedia>, TripMapError>> + Send;

    /// Count all entries and return the requested page, newest first.
    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Multimedia>, TripMapError>> + Send;

    /// All entries attached to a marker, newest first.
    fn find_by_marker(
        &self,
        marker_id: MarkerId,
    ) -> impl Future<Output = Result<Vec<Multimedia>, TripMapError>> + Send;

    /// Overwrite the notes of an entry. Returns `false` when no row matched.
    fn update_notes(
        &self,
        id: MultimediaId,
        notes: Option<String>,
    ) -> impl Future<Output = Result<bool, TripMapError>> + Send;

    /// Delete an entry. Returns `false` when no row matched.
    fn delete(
        &self,
        id: MultimediaId,
    ) -> impl Future<Output = Result<bool, TripMapError>> + Send;
}
