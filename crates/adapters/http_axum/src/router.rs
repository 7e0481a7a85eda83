//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tripmap_app::ports::{FileStore, MapRepository, MarkerRepository, MultimediaRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the resource routes at the root and serves stored uploads
/// read-only under `/uploads`. CORS is permissive for the browser frontend.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<MR, KR, MMR, F>(state: AppState<MR, KR, MMR, F>) -> Router
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let uploads = ServeDir::new(state.uploads_dir.as_path());

    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .nest_service("/uploads", uploads)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (state, _) = test_state(std::env::temp_dir());
        let app = build(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn should_allow_any_origin() {
        let (state, _) = test_state(std::env::temp_dir());
        let app = build(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn should_serve_stored_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("photos")).unwrap();
        std::fs::write(root.join("photos/beach.jpg"), b"jpeg bytes").unwrap();

        let (state, _) = test_state(root);
        let app = build(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/uploads/photos/beach.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"jpeg bytes");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/uploads/photos/missing.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
