use std::sync::Arc;

use crate::{
    note::{NoteServiceError, NoteState},
    todo::{TodoServiceError, TodoState},
    web::{AppState, health_check_handler},
};

use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServerErrorResponse {
    /// Human-readable description of what went wrong
    pub error: String,
}

impl ServerErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

/// Errors surfaced by the JSON API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field was missing or malformed (400).
    #[error("{0}")]
    Validation(String),
    /// No record matches the requested ID (404).
    #[error("{0}")]
    NotFound(String),
    /// The store failed; the detail is logged and never sent to the client (500).
    #[error("Store error: {0}")]
    Store(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => {
                tracing::warn!("{}", message);
                (StatusCode::NOT_FOUND, message)
            }
            ApiError::Store(detail) => {
                tracing::error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ServerErrorResponse::new(message))).into_response()
    }
}

impl From<TodoServiceError> for ApiError {
    fn from(err: TodoServiceError) -> Self {
        match err {
            TodoServiceError::EmptyTitle | TodoServiceError::InvalidPriority(_) => {
                ApiError::Validation(err.to_string())
            }
            TodoServiceError::TodoNotFound(_) => ApiError::NotFound("Todo not found".to_string()),
            TodoServiceError::Database(db_err) => ApiError::Store(db_err.to_string()),
        }
    }
}

impl From<NoteServiceError> for ApiError {
    fn from(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::EmptyTitle => ApiError::Validation(err.to_string()),
            NoteServiceError::NoteNotFound(_) => ApiError::NotFound("Note not found".to_string()),
            NoteServiceError::Database(db_err) => ApiError::Store(db_err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::Validation("ID must be an integer".to_string())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::todo::api::list_todos_handler,
        crate::todo::api::create_todo_handler,
        crate::todo::api::delete_todo_handler,
        crate::todo::api::toggle_todo_handler,
        crate::note::api::list_notes_handler,
        crate::note::api::get_note_handler,
        crate::note::api::create_note_handler,
        crate::note::api::update_note_handler,
        crate::note::api::delete_note_handler,
        crate::web::health_check_handler,
    ),
    tags(
        (name = "Todos", description = "Task management"),
        (name = "Notes", description = "Note management"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Creates the `/api` routes for every resource plus the health check.
pub fn create_api_router(
    todo_state: Arc<TodoState>,
    note_state: Arc<NoteState>,
    app_state: Arc<AppState>,
) -> Router {
    let todos_router = crate::todo::api::create_api_router(todo_state);
    let notes_router = crate::note::api::create_api_router(note_state);
    let health_router = Router::new()
        .route("/health", get(health_check_handler))
        .with_state(app_state);

    let api_routes = todos_router.merge(notes_router).merge(health_router);
    Router::new().nest("/api", api_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn can_hide_store_detail_from_client() {
        let response = ApiError::Store("relation \"todos\" does not exist".to_string())
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Internal server error" })
        );
    }

    #[tokio::test]
    async fn can_map_todo_errors_to_status_codes() {
        let validation = ApiError::from(TodoServiceError::EmptyTitle).into_response();
        let not_found = ApiError::from(TodoServiceError::TodoNotFound(7)).into_response();

        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(not_found).await,
            serde_json::json!({ "error": "Todo not found" })
        );
    }

    #[test]
    fn can_describe_every_route_in_openapi() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.contains(&&"/api/todos".to_string()));
        assert!(paths.contains(&&"/api/todos/{id}/toggle".to_string()));
        assert!(paths.contains(&&"/api/notes/{id}".to_string()));
        assert!(paths.contains(&&"/api/health".to_string()));
    }
}
