//! In-memory ports and request helpers for exercising the router.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tripmap_app::ports::{FileStore, MapRepository, MarkerRepository, MultimediaRepository};
use tripmap_app::services::map_service::MapService;
use tripmap_app::services::marker_service::MarkerService;
use tripmap_app::services::multimedia_service::MultimediaService;
use tripmap_domain::error::TripMapError;
use tripmap_domain::id::{MapId, MarkerId, MultimediaId};
use tripmap_domain::map::{Map, MapDraft};
use tripmap_domain::marker::{Marker, MarkerDraft};
use tripmap_domain::multimedia::{FileUpload, Multimedia, NewMultimedia};
use tripmap_domain::pagination::{Page, PageRequest};
use tripmap_domain::time;

use crate::state::AppState;

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let slice = items
        .iter()
        .skip(usize::try_from(page.offset()).unwrap())
        .take(page.limit() as usize)
        .cloned()
        .collect();
    Page::new(slice, items.len() as u64, page)
}

#[derive(Default)]
pub struct MemMaps {
    store: Mutex<BTreeMap<MapId, Map>>,
}

impl MapRepository for MemMaps {
    async fn create(&self, draft: MapDraft) -> Result<Map, TripMapError> {
        let mut store = self.store.lock().unwrap();
        let next = store.keys().next_back().map_or(1, |id| id.get() + 1);
        let map = draft.into_map(MapId::new(next));
        store.insert(map.id, map.clone());
        Ok(map)
    }

    async fn get_by_id(&self, id: MapId) -> Result<Option<Map>, TripMapError> {
        Ok(self.store.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Map>, TripMapError> {
        let items: Vec<Map> = self.store.lock().unwrap().values().cloned().collect();
        Ok(page_of(&items, page))
    }

    async fn update(&self, id: MapId, draft: MapDraft) -> Result<bool, TripMapError> {
        let mut store = self.store.lock().unwrap();
        Ok(store
            .get_mut(&id)
            .map(|slot| *slot = draft.into_map(id))
            .is_some())
    }

    async fn delete(&self, id: MapId) -> Result<bool, TripMapError> {
        Ok(self.store.lock().unwrap().remove(&id).is_some())
    }
}

/// Shared between the marker and multimedia services.
#[derive(Clone, Default)]
pub struct MemMarkers {
    store: Arc<Mutex<BTreeMap<MarkerId, Marker>>>,
}

impl MarkerRepository for MemMarkers {
    async fn create(&self, draft: MarkerDraft) -> Result<Marker, TripMapError> {
        let mut store = self.store.lock().unwrap();
        let next = store.keys().next_back().map_or(1, |id| id.get() + 1);
        let marker = draft.into_marker(MarkerId::new(next));
        store.insert(marker.id, marker.clone());
        Ok(marker)
    }

    async fn get_by_id(&self, id: MarkerId) -> Result<Option<Marker>, TripMapError> {
        Ok(self.store.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Marker>, TripMapError> {
        let items: Vec<Marker> = self.store.lock().unwrap().values().cloned().collect();
        Ok(page_of(&items, page))
    }

    async fn update(&self, id: MarkerId, draft: MarkerDraft) -> Result<bool, TripMapError> {
        let mut store = self.store.lock().unwrap();
        Ok(store
            .get_mut(&id)
            .map(|slot| *slot = draft.into_marker(id))
            .is_some())
    }

    async fn delete(&self, id: MarkerId) -> Result<bool, TripMapError> {
        Ok(self.store.lock().unwrap().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemMultimedia {
    store: Mutex<BTreeMap<MultimediaId, Multimedia>>,
}

impl MemMultimedia {
    /// Newest first, ties broken by id.
    fn sorted(&self, marker: Option<MarkerId>) -> Vec<Multimedia> {
        let mut items: Vec<Multimedia> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|m| marker.is_none_or(|id| m.marker_id == id))
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        items
    }
}

impl MultimediaRepository for MemMultimedia {
    async fn create(&self, entry: NewMultimedia) -> Result<Multimedia, TripMapError> {
        let mut store = self.store.lock().unwrap();
        let next = store.keys().next_back().map_or(1, |id| id.get() + 1);
        let row = entry.into_multimedia(MultimediaId::new(next), time::now());
        store.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: MultimediaId) -> Result<Option<Multimedia>, TripMapError> {
        Ok(self.store.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Multimedia>, TripMapError> {
        Ok(page_of(&self.sorted(None), page))
    }

    async fn find_by_marker(&self, marker_id: MarkerId) -> Result<Vec<Multimedia>, TripMapError> {
        Ok(self.sorted(Some(marker_id)))
    }

    async fn update_notes(
        &self,
        id: MultimediaId,
        notes: Option<String>,
    ) -> Result<bool, TripMapError> {
        let mut store = self.store.lock().unwrap();
        Ok(store.get_mut(&id).map(|row| row.notes = notes).is_some())
    }

    async fn delete(&self, id: MultimediaId) -> Result<bool, TripMapError> {
        Ok(self.store.lock().unwrap().remove(&id).is_some())
    }
}

/// Records saved paths instead of touching the disk.
#[derive(Clone, Default)]
pub struct MemFiles {
    saved: Arc<Mutex<BTreeSet<String>>>,
}

impl FileStore for MemFiles {
    fn save(
        &self,
        upload: &FileUpload,
    ) -> impl Future<Output = Result<String, TripMapError>> + Send {
        let dir = upload.media_type().directory().unwrap_or("photos");
        let mut saved = self.saved.lock().unwrap();
        let path = format!("uploads/{dir}/{}-{}", saved.len(), upload.original_name);
        saved.insert(path.clone());
        async { Ok(path) }
    }

    fn remove(&self, filepath: &str) -> impl Future<Output = Result<(), TripMapError>> + Send {
        self.saved.lock().unwrap().remove(filepath);
        async { Ok(()) }
    }
}

pub type TestState = AppState<MemMaps, MemMarkers, MemMultimedia, MemFiles>;

pub fn test_state(uploads_dir: impl Into<PathBuf>) -> (TestState, MemFiles) {
    let markers = MemMarkers::default();
    let files = MemFiles::default();
    let state = AppState::new(
        MapService::new(MemMaps::default()),
        MarkerService::new(markers.clone()),
        MultimediaService::new(MemMultimedia::default(), markers, files.clone()),
        uploads_dir,
    );
    (state, files)
}

/// A fully wired router over in-memory ports.
pub struct TestApp {
    router: Router,
    files: MemFiles,
}

impl TestApp {
    pub fn new() -> Self {
        let (state, files) = test_state(std::env::temp_dir().join("tripmap-test-uploads"));
        Self {
            router: crate::router::build(state),
            files,
        }
    }

    pub fn stored_files(&self) -> Vec<String> {
        self.files.saved.lock().unwrap().iter().cloned().collect()
    }

    pub fn clear_files(&self) {
        self.files.saved.lock().unwrap().clear();
    }
}

/// A file part of a multipart upload.
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub async fn send_raw(
    app: &TestApp,
    method: &str,
    uri: &str,
    content_type: &str,
    body: Vec<u8>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let bytes = body.map(|b| b.to_string().into_bytes()).unwrap_or_default();
    send_raw(app, method, uri, "application/json", bytes).await
}

pub async fn send_multipart(
    app: &TestApp,
    fields: &[(&str, &str)],
    files: &[FilePart],
) -> (StatusCode, serde_json::Value) {
    const BOUNDARY: &str = "tripmap-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    send_raw(
        app,
        "POST",
        "/multimedia/upload",
        &format!("multipart/form-data; boundary={BOUNDARY}"),
        body,
    )
    .await
}
