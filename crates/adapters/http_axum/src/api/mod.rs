//! JSON REST API handler modules.
//!
//! Every body is an envelope carrying `success`. Errors are rendered by
//! [`crate::error::ApiError`].

#[allow(clippy::missing_errors_doc)]
pub mod maps;
#[allow(clippy::missing_errors_doc)]
pub mod markers;
#[allow(clippy::missing_errors_doc)]
pub mod multimedia;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use tripmap_app::ports::{FileStore, MapRepository, MarkerRepository, MultimediaRepository};
use tripmap_domain::multimedia::{MAX_FILE_SIZE, MAX_FILES_PER_UPLOAD};
use tripmap_domain::pagination::{Page, PageInfo, PageRequest};

use crate::state::AppState;

/// Largest accepted upload request: a full batch plus room for the form
/// boundaries and text fields.
#[allow(clippy::cast_possible_truncation)]
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILES_PER_UPLOAD * MAX_FILE_SIZE as usize + 1024 * 1024;

/// `?page=&limit=` as sent by the client. Values are parsed leniently.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    #[must_use]
    pub fn into_request(self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// `{ success, info, results }`
#[derive(Serialize)]
pub struct PagedBody<T> {
    success: bool,
    info: PageInfo,
    results: Vec<T>,
}

impl<T> From<Page<T>> for PagedBody<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            info: page.info(),
            results: page.items,
        }
    }
}

/// `{ success, result }`
#[derive(Serialize)]
pub struct ItemBody<T> {
    success: bool,
    result: T,
}

impl<T> ItemBody<T> {
    pub fn new(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// `{ success, message }`
#[derive(Serialize)]
pub struct MessageBody {
    success: bool,
    message: &'static str,
}

impl MessageBody {
    #[must_use]
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Build the resource routers, mounted at the root.
pub fn routes<MR, KR, MMR, F>() -> Router<AppState<MR, KR, MMR, F>>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    Router::new()
        // Maps
        .route(
            "/maps",
            get(maps::list::<MR, KR, MMR, F>).post(maps::create::<MR, KR, MMR, F>),
        )
        .route(
            "/maps/{id}",
            get(maps::get::<MR, KR, MMR, F>)
                .put(maps::update::<MR, KR, MMR, F>)
                .delete(maps::delete::<MR, KR, MMR, F>),
        )
        // Markers
        .route(
            "/markers",
            get(markers::list::<MR, KR, MMR, F>).post(markers::create::<MR, KR, MMR, F>),
        )
        .route(
            "/markers/{id}",
            get(markers::get::<MR, KR, MMR, F>)
                .put(markers::update::<MR, KR, MMR, F>)
                .delete(markers::delete::<MR, KR, MMR, F>),
        )
        // Multimedia
        .route(
            "/multimedia",
            get(multimedia::list::<MR, KR, MMR, F>)
                .post(multimedia::create_legacy::<MR, KR, MMR, F>),
        )
        .route(
            "/multimedia/upload",
            post(multimedia::upload::<MR, KR, MMR, F>)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/multimedia/note",
            post(multimedia::create_note::<MR, KR, MMR, F>),
        )
        .route(
            "/multimedia/marker/{id}",
            get(multimedia::list_by_marker::<MR, KR, MMR, F>),
        )
        .route(
            "/multimedia/{id}",
            get(multimedia::get::<MR, KR, MMR, F>)
                .put(multimedia::update::<MR, KR, MMR, F>)
                .delete(multimedia::delete::<MR, KR, MMR, F>),
        )
}
