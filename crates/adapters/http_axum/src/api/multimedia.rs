//! REST handlers for multimedia entries: listing, uploads, notes.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer, Serialize};

use tripmap_app::ports::{FileStore, MapRepository, MarkerRepository, MultimediaRepository};
use tripmap_domain::error::ValidationError;
use tripmap_domain::id::{MarkerId, MultimediaId};
use tripmap_domain::input::NumberInput;
use tripmap_domain::multimedia::{
    self, FileUpload, MAX_FILE_SIZE, MediaType, Multimedia, NewMultimedia, NotesUpdate,
};

use super::{ItemBody, MessageBody, PageQuery, PagedBody};
use crate::error::ApiError;
use crate::state::AppState;

/// Content type assumed for file parts that do not declare one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Request body for `POST /multimedia/note`.
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    #[serde(rename = "idMarker")]
    pub marker_id: Option<NumberInput>,
    pub notes: Option<String>,
}

/// Request body for the legacy `POST /multimedia`.
#[derive(Debug, Deserialize)]
pub struct LegacyRequest {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    #[serde(rename = "idMarker")]
    pub marker_id: Option<NumberInput>,
    pub notes: Option<String>,
}

/// Request body for `PUT /multimedia/:id`.
///
/// An absent `notes` key keeps the stored value; `null` clears it. A missing
/// or non-JSON body reads as `{}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub notes: Option<Option<String>>,
}

/// Distinguish an explicit `null` from a missing key.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// One stored file as echoed back by the upload endpoint.
#[derive(Serialize)]
pub struct UploadedFile {
    #[serde(rename = "idMultimedia")]
    id: MultimediaId,
    filename: Option<String>,
    filepath: Option<String>,
    #[serde(rename = "type")]
    media_type: MediaType,
}

impl From<Multimedia> for UploadedFile {
    fn from(entry: Multimedia) -> Self {
        Self {
            id: entry.id,
            filename: entry.filename,
            filepath: entry.filepath,
            media_type: entry.media_type,
        }
    }
}

/// `{ success, message, files }`
#[derive(Serialize)]
pub struct UploadBody {
    success: bool,
    message: String,
    files: Vec<UploadedFile>,
}

/// `{ success, count, results }`
#[derive(Serialize)]
pub struct ByMarkerBody {
    success: bool,
    count: usize,
    results: Vec<Multimedia>,
}

/// `{ success, idMultimedia, message? }`
#[derive(Serialize)]
pub struct CreatedBody {
    success: bool,
    #[serde(rename = "idMultimedia")]
    id: MultimediaId,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Page(Json<PagedBody<Multimedia>>),
    ByMarker(Json<ByMarkerBody>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Page(json) => json.into_response(),
            Self::ByMarker(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<ItemBody<Multimedia>>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the creating endpoints.
pub enum CreateResponse {
    Uploaded(Json<UploadBody>),
    Created(Json<CreatedBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Uploaded(json) => json.into_response(),
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

/// `GET /multimedia`
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
        .multimedia_service
        .list_multimedia(query.into_request())
        .await?;
    Ok(ListResponse::Page(Json(page.into())))
}

/// `GET /multimedia/marker/:idMarker`
pub async fn list_by_marker<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    Path(id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let marker_id = MarkerId::from_str(&id)?;
    let results = state.multimedia_service.list_by_marker(marker_id).await?;
    Ok(ListResponse::ByMarker(Json(ByMarkerBody {
        success: true,
        count: results.len(),
        results,
    })))
}

/// `GET /multimedia/:id`
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
    let multimedia_id = MultimediaId::from_str(&id)?;
    let entry = state.multimedia_service.get_multimedia(multimedia_id).await?;
    Ok(GetResponse::Ok(Json(ItemBody::new(entry))))
}

/// Fields of an upload form once every part has been read.
#[derive(Default)]
struct UploadForm {
    marker_id: Option<NumberInput>,
    notes: Option<String>,
    files: Vec<FileUpload>,
}

/// Buffer one file part, giving up as soon as it outgrows [`MAX_FILE_SIZE`].
async fn read_file_part(mut field: Field<'_>) -> Result<Vec<u8>, ApiError> {
    let limit = usize::try_from(MAX_FILE_SIZE).unwrap_or(usize::MAX);
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if data.len() + chunk.len() > limit {
            return Err(ValidationError::FileTooLarge {
                max_bytes: MAX_FILE_SIZE,
            }
            .into());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("files") => {
                let original_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_owned();
                let data = read_file_part(field).await?;
                form.files.push(FileUpload {
                    original_name,
                    content_type,
                    data,
                });
            }
            Some("idMarker") => form.marker_id = Some(NumberInput::Text(field.text().await?)),
            Some("notes") => form.notes = Some(field.text().await?),
            other => tracing::debug!(field = ?other, "ignoring unexpected upload field"),
        }
    }
    Ok(form)
}

/// `POST /multimedia/upload` (multipart: `files`, `idMarker`, `notes`)
pub async fn upload<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<CreateResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let form = read_upload_form(multipart?).await?;
    let marker_id = multimedia::marker_reference(form.marker_id)?;

    let created = state
        .multimedia_service
        .upload_files(marker_id, form.files, form.notes)
        .await?;

    Ok(CreateResponse::Uploaded(Json(UploadBody {
        success: true,
        message: format!("{} file(s) uploaded successfully", created.len()),
        files: created.into_iter().map(UploadedFile::from).collect(),
    })))
}

/// `POST /multimedia/note`
pub async fn create_note<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let marker_id = multimedia::marker_reference(req.marker_id)?;
    let notes = multimedia::note_text(req.notes)?;

    let created = state
        .multimedia_service
        .create_note(marker_id, notes)
        .await?;
    Ok(CreateResponse::Created(Json(CreatedBody {
        success: true,
        id: created.id,
        message: Some("Note added successfully"),
    })))
}

/// `POST /multimedia`
pub async fn create_legacy<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    payload: Result<Json<LegacyRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let entry = NewMultimedia::generic(req.media_type, req.marker_id, req.notes)?;

    let created = state.multimedia_service.create_unchecked(entry).await?;
    Ok(CreateResponse::Created(Json(CreatedBody {
        success: true,
        id: created.id,
        message: None,
    })))
}

/// `PUT /multimedia/:id`
pub async fn update<MR, KR, MMR, F>(
    State(state): State<AppState<MR, KR, MMR, F>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<MessageResponse, ApiError>
where
    MR: MapRepository + Send + Sync + 'static,
    KR: MarkerRepository + Send + Sync + 'static,
    MMR: MultimediaRepository + Send + Sync + 'static,
    F: FileStore + Send + Sync + 'static,
{
    let multimedia_id = MultimediaId::from_str(&id)?;
    let req = if is_json(&headers) && !body.trim_ascii().is_empty() {
        let Json(req) = Json::<UpdateRequest>::from_bytes(&body)?;
        req
    } else {
        UpdateRequest::default()
    };

    state
        .multimedia_service
        .update_notes(multimedia_id, NotesUpdate { notes: req.notes })
        .await?;
    Ok(MessageResponse::Ok(Json(MessageBody::new(
        "Multimedia entry updated successfully",
    ))))
}

/// Whether the request declares a JSON body (`application/json`, `*+json`).
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().ends_with("json"))
}

/// `DELETE /multimedia/:id`
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
    let multimedia_id = MultimediaId::from_str(&id)?;
    state
        .multimedia_service
        .delete_multimedia(multimedia_id)
        .await?;
    Ok(MessageResponse::Ok(Json(MessageBody::new(
        "Multimedia entry deleted successfully",
    ))))
}
