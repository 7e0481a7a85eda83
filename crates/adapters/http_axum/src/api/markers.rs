//! JSON REST handlers for markers.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use tripmap_app::ports::{FileStore, MapRepository, MarkerRepository, MultimediaRepository};
use tripmap_domain::id::MarkerId;
use tripmap_domain::input::NumberInput;
use tripmap_domain::marker::{Marker, MarkerDraft};

use super::{ItemBody, MessageBody, PageQuery, PagedBody};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or updating a marker.
#[derive(Debug, Deserialize)]
pub struct MarkerRequest {
    pub title: Option<String>,
    pub latitude: Option<NumberInput>,
    pub longitude: Option<NumberInput>,
    #[serde(rename = "idMap")]
    pub map_id: Option<NumberInput>,
}

impl MarkerRequest {
    fn into_draft(self) -> Result<MarkerDraft, ApiError> {
        Ok(MarkerDraft::builder()
            .raw(self.title, self.latitude, self.longitude, self.map_id)
            .build()?)
    }
}

/// `{ success, idMarker }`
#[derive(Serialize)]
pub struct CreatedBody {
    success: bool,
    #[serde(rename = "idMarker")]
    id: MarkerId,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<PagedBody<Marker>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<ItemBody<Marker>>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => json.into_response(),
        }
    }
}

/// Possible responses from the update and delete endpoints.
pub enum MessageResponse {
    Ok(Json<MessageBody>),
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /markers`
pub async fn list<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    Query(query): Query<PageQuery>,
) -> Result<ListResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let page = state
        .marker_service
        .list_markers(query.into_request())
        .await?;
    Ok(ListResponse::Ok(Json(page.into())))
}

/// `GET /markers/:id`
pub async fn get<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let marker_id = MarkerId::from_str(&id)?;
    let marker = state.marker_service.get_marker(marker_id).await?;
    Ok(GetResponse::Ok(Json(ItemBody::new(marker))))
}

/// `POST /markers`
pub async fn create<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    payload: Result<Json<MarkerRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let created = state.marker_service.create_marker(req.into_draft()?).await?;
    Ok(CreateResponse::Created(Json(CreatedBody {
        success: true,
        id: created.id,
    })))
}

/// `PUT /markers/:id`
pub async fn update<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    Path(id): Path<String>,
    payload: Result<Json<MarkerRequest>, JsonRejection>,
) -> Result<MessageResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let marker_id = MarkerId::from_str(&id)?;
    let Json(req) = payload?;
    state
        .marker_service
        .update_marker(marker_id, req.into_draft()?)
        .await?;
    Ok(MessageResponse::Ok(Json(MessageBody::new(
        "Marker updated successfully",
    ))))
}

/// `DELETE /markers/:id`
pub async fn delete<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    Path(id): Path<String>,
) -> Result<MessageResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let marker_id = MarkerId::from_str(&id)?;
    state.marker_service.delete_marker(marker_id).await?;
    Ok(MessageResponse::Ok(Json(MessageBody::new(
        "Marker deleted successfully",
    ))))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{TestApp, send_json};

    async fn create_marker(app: &TestApp, title: &str, latitude: f64) -> i64 {
        let (status, body) = send_json(
            app,
            "POST",
            "/markers",
            Some(json!({
                "title": title,
                "latitude": latitude,
                "longitude": -74.0445,
                "idMap": 1,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["idMarker"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn should_create_and_fetch_marker() {
        let app = TestApp::new();
        let id = create_marker(&app, "Statue of Liberty", 40.6892).await;

        let (status, body) = send_json(&app, "GET", &format!("/markers/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["title"], "Statue of Liberty");
        assert_eq!(body["result"]["latitude"], 40.6892);
        assert_eq!(body["result"]["idMap"], 1);
    }

    #[tokio::test]
    async fn should_accept_coordinates_sent_as_strings() {
        let app = TestApp::new();
        let (status, body) = send_json(
            &app,
            "POST",
            "/markers",
            Some(json!({"title": "Cafe", "latitude": "48.85", "longitude": "2.35", "idMap": "3"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    #[tokio::test]
    async fn should_reject_non_numeric_coordinates() {
        let app = TestApp::new();
        let (status, body) = send_json(
            &app,
            "POST",
            "/markers",
            Some(json!({"title": "Cafe", "latitude": "north", "longitude": 2.35, "idMap": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Latitude and longitude must be valid numbers");
    }

    #[tokio::test]
    async fn should_report_not_found_for_empty_marker_page() {
        let app = TestApp::new();
        let (status, body) = send_json(&app, "GET", "/markers", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No markers found");

        create_marker(&app, "Pier", 40.7).await;
        let (status, body) = send_json(&app, "GET", "/markers?page=1&limit=5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["total"], 1);
        assert_eq!(body["info"]["totalPages"], 1);

        let (status, _) = send_json(&app, "GET", "/markers?page=2&limit=5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_update_marker_and_keep_latitude_when_zero_is_sent() {
        let app = TestApp::new();
        let id = create_marker(&app, "Pier", 40.7).await;

        let (status, body) = send_json(
            &app,
            "PUT",
            &format!("/markers/{id}"),
            Some(json!({"title": "Pier 17", "latitude": 40.8, "longitude": -74.0, "idMap": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Marker updated successfully");

        let (status, _) = send_json(
            &app,
            "PUT",
            &format!("/markers/{id}"),
            Some(json!({"title": "Pier 17", "latitude": 0, "longitude": -74.0, "idMap": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send_json(&app, "GET", &format!("/markers/{id}"), None).await;
        assert_eq!(body["result"]["title"], "Pier 17");
        assert_eq!(body["result"]["latitude"], 40.8);
    }

    #[tokio::test]
    async fn should_store_zero_latitude_sent_as_text() {
        let app = TestApp::new();
        let id = create_marker(&app, "Equator", 38.7).await;

        let (status, body) = send_json(
            &app,
            "PUT",
            &format!("/markers/{id}"),
            Some(json!({"title": "Equator", "latitude": "0", "longitude": -9.1, "idMap": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let (_, body) = send_json(&app, "GET", &format!("/markers/{id}"), None).await;
        assert_eq!(body["result"]["latitude"], 0.0);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_or_deleting_missing_marker() {
        let app = TestApp::new();
        let body = json!({"title": "Ghost", "latitude": 1.0, "longitude": 1.0, "idMap": 1});

        let (status, _) = send_json(&app, "PUT", "/markers/42", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send_json(&app, "DELETE", "/markers/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Marker not found");
    }

    #[tokio::test]
    async fn should_delete_marker() {
        let app = TestApp::new();
        let id = create_marker(&app, "Gone", 1.0).await;

        let (status, body) = send_json(&app, "DELETE", &format!("/markers/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Marker deleted successfully");
    }

    #[tokio::test]
    async fn should_reject_non_numeric_marker_id() {
        let app = TestApp::new();
        let (status, body) = send_json(&app, "GET", "/markers/first", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid ID format. ID must be a number.");
    }
}
