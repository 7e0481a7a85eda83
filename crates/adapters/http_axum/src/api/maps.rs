//! JSON REST handlers for maps.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use tripmap_app::ports::{FileStore, MapRepository, MarkerRepository, MultimediaRepository};
use tripmap_domain::id::MapId;
use tripmap_domain::input::NumberInput;
use tripmap_domain::map::{Map, MapDraft};

use super::{ItemBody, MessageBody, PageQuery, PagedBody};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or replacing a map.
#[derive(Debug, Deserialize)]
pub struct MapRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy: Option<String>,
    #[serde(rename = "idUser")]
    pub user_id: Option<NumberInput>,
}

impl MapRequest {
    fn into_draft(self) -> Result<MapDraft, ApiError> {
        Ok(MapDraft::builder()
            .raw(self.name, self.description, self.privacy, self.user_id)
            .build()?)
    }
}

/// `{ success, idMap }`
#[derive(Serialize)]
pub struct CreatedBody {
    success: bool,
    #[serde(rename = "idMap")]
    id: MapId,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<PagedBody<Map>>),
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
    Ok(Json<ItemBody<Map>>),
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

/// `GET /maps`
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
    let page = state.map_service.list_maps(query.into_request()).await?;
    Ok(ListResponse::Ok(Json(page.into())))
}

/// `GET /maps/:id`
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
    let map_id = MapId::from_str(&id)?;
    let map = state.map_service.get_map(map_id).await?;
    Ok(GetResponse::Ok(Json(ItemBody::new(map))))
}

/// `POST /maps`
pub async fn create<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    payload: Result<Json<MapRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let created = state.map_service.create_map(req.into_draft()?).await?;
    Ok(CreateResponse::Created(Json(CreatedBody {
        success: true,
        id: created.id,
    })))
}

/// `PUT /maps/:id`
pub async fn update<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    Path(id): Path<String>,
    payload: Result<Json<MapRequest>, JsonRejection>,
) -> Result<MessageResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let map_id = MapId::from_str(&id)?;
    let Json(req) = payload?;
    state
        .map_service
        .update_map(map_id, req.into_draft()?)
        .await?;
    Ok(MessageResponse::Ok(Json(MessageBody::new(
        "Map updated successfully",
    ))))
}

/// `DELETE /maps/:id`
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
    let map_id = MapId::from_str(&id)?;
    state.map_service.delete_map(map_id).await?;
    Ok(MessageResponse::Ok(Json(MessageBody::new(
        "Map deleted successfully",
    ))))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{TestApp, send_json};

    #[tokio::test]
    async fn should_create_fetch_and_delete_map_end_to_end() {
        let app = TestApp::new();

        let (status, body) = send_json(
            &app,
            "POST",
            "/maps",
            Some(json!({"name": "Test Map", "privacy": "private", "idUser": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let id = body["idMap"].as_i64().unwrap();

        let (status, body) = send_json(&app, "GET", &format!("/maps/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["name"], "Test Map");
        assert_eq!(body["result"]["privacy"], "private");
        assert_eq!(body["result"]["idUser"], 1);

        let (status, body) = send_json(&app, "DELETE", &format!("/maps/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Map deleted successfully");

        let (status, body) = send_json(&app, "GET", &format!("/maps/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Map not found");
    }

    #[tokio::test]
    async fn should_accept_numeric_strings_for_user_id() {
        let app = TestApp::new();
        let (status, body) = send_json(
            &app,
            "POST",
            "/maps",
            Some(json!({"name": "Road Trip", "privacy": "public", "idUser": "7"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    async fn create_named(app: &TestApp, name: &str) -> (StatusCode, serde_json::Value) {
        send_json(
            app,
            "POST",
            "/maps",
            Some(json!({"name": name, "privacy": "public", "idUser": 1})),
        )
        .await
    }

    #[tokio::test]
    async fn should_enforce_name_length_bounds() {
        let app = TestApp::new();

        assert_eq!(create_named(&app, "ab").await.0, StatusCode::BAD_REQUEST);
        assert_eq!(create_named(&app, "abc").await.0, StatusCode::OK);
        assert_eq!(create_named(&app, &"a".repeat(255)).await.0, StatusCode::OK);
        let (status, body) = create_named(&app, &"a".repeat(256)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Name must be between 3 and 255 characters");
    }

    #[tokio::test]
    async fn should_reject_missing_fields_and_bad_privacy() {
        let app = TestApp::new();

        let (status, body) = send_json(&app, "POST", "/maps", Some(json!({"name": "Trip"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing required fields: name, privacy, idUser");

        let (status, body) = send_json(
            &app,
            "POST",
            "/maps",
            Some(json!({"name": "Trip", "privacy": "secret", "idUser": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Privacy must be 'public' or 'private'");
    }

    #[tokio::test]
    async fn should_paginate_maps_and_return_empty_page_beyond_range() {
        let app = TestApp::new();
        for name in ["First", "Second", "Third"] {
            create_named(&app, name).await;
        }

        let (status, body) = send_json(&app, "GET", "/maps?page=2&limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["info"],
            json!({"total": 3, "page": 2, "limit": 2, "totalPages": 2})
        );
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["results"][0]["name"], "Third");

        let (status, body) = send_json(&app, "GET", "/maps?page=9", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_use_default_pagination_for_garbage_query() {
        let app = TestApp::new();
        let (status, body) = send_json(&app, "GET", "/maps?page=abc&limit=-5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["page"], 1);
        assert_eq!(body["info"]["limit"], 10);
    }

    #[tokio::test]
    async fn should_replace_map_and_report_missing_one() {
        let app = TestApp::new();
        let (_, body) = create_named(&app, "Before").await;
        let id = body["idMap"].as_i64().unwrap();

        let replacement = json!({"name": "After", "privacy": "private", "idUser": 2});
        let (status, body) =
            send_json(&app, "PUT", &format!("/maps/{id}"), Some(replacement.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Map updated successfully");

        let (_, body) = send_json(&app, "GET", &format!("/maps/{id}"), None).await;
        assert_eq!(body["result"]["name"], "After");
        assert_eq!(body["result"]["idUser"], 2);

        let (status, _) = send_json(&app, "PUT", "/maps/999", Some(replacement)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_reject_non_numeric_path_id() {
        let app = TestApp::new();
        let (status, body) = send_json(&app, "GET", "/maps/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid ID format. ID must be a number.");
    }

    #[tokio::test]
    async fn should_reject_malformed_json_in_envelope() {
        let app = TestApp::new();
        let (status, body) = crate::test_support::send_raw(
            &app,
            "POST",
            "/maps",
            "application/json",
            b"{not json".to_vec(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
