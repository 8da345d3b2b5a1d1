use crate::note::{NoteService, NoteState};
use crate::web::api::{ApiError, ServerErrorResponse};
use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskmaster_core::Note;
use utoipa::ToSchema;

/// JSON representation of a Note for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoteJson {
    /// Unique identifier assigned by the store
    id: i32,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    /// Refreshed on every update
    updated_at: DateTime<Utc>,
}

impl From<Note> for NoteJson {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Request body for creating or replacing a note.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NoteRequest {
    /// Required, must not be blank
    #[serde(default)]
    title: Option<String>,
    /// Defaults to an empty string
    #[serde(default)]
    content: Option<String>,
}

/// Response for a deleted note.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteNoteResponse {
    message: String,
    note: NoteJson,
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "Successfully retrieved notes", body = Vec<NoteJson>),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Notes"
)]
pub async fn list_notes_handler(
    State(state): State<Arc<NoteState>>,
) -> Result<Json<Vec<NoteJson>>, ApiError> {
    let service = NoteService::new(&state.db);
    let notes = service.list_notes().await?;
    Ok(Json(notes.into_iter().map(NoteJson::from).collect()))
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(("id" = i32, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note found", body = NoteJson),
        (status = 404, description = "Note not found", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Notes"
)]
pub async fn get_note_handler(
    State(state): State<Arc<NoteState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<NoteJson>, ApiError> {
    let Path(id) = id?;
    let service = NoteService::new(&state.db);
    let note = service.get_note(id).await?;
    Ok(Json(NoteJson::from(note)))
}

#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteJson),
        (status = 400, description = "Missing title", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Notes"
)]
pub async fn create_note_handler(
    State(state): State<Arc<NoteState>>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteJson>), ApiError> {
    let Json(request) = payload?;
    let service = NoteService::new(&state.db);
    let note = service
        .create_note(request.title.unwrap_or_default(), request.content)
        .await?;
    Ok((StatusCode::CREATED, Json(NoteJson::from(note))))
}

/// Handler for PUT /api/notes/{id} - Replaces title and content wholesale.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(("id" = i32, Path, description = "Note ID")),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteJson),
        (status = 400, description = "Missing title", body = ServerErrorResponse),
        (status = 404, description = "Note not found", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Notes"
)]
pub async fn update_note_handler(
    State(state): State<Arc<NoteState>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Json<NoteJson>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let service = NoteService::new(&state.db);
    let note = service
        .update_note(id, request.title.unwrap_or_default(), request.content)
        .await?;
    Ok(Json(NoteJson::from(note)))
}

#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(("id" = i32, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note deleted", body = DeleteNoteResponse),
        (status = 404, description = "Note not found", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Notes"
)]
pub async fn delete_note_handler(
    State(state): State<Arc<NoteState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteNoteResponse>, ApiError> {
    let Path(id) = id?;
    let service = NoteService::new(&state.db);
    let note = service.delete_note(id).await?;
    Ok(Json(DeleteNoteResponse {
        message: "Note deleted successfully".to_string(),
        note: NoteJson::from(note),
    }))
}

/// Creates and returns the notes API router.
pub fn create_api_router(state: Arc<NoteState>) -> Router {
    Router::new()
        .route("/notes", get(list_notes_handler).post(create_note_handler))
        .route(
            "/notes/{id}",
            get(get_note_handler)
                .put(update_note_handler)
                .delete(delete_note_handler),
        )
        .with_state(state)
}
