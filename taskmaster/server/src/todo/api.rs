use crate::todo::{TodoService, TodoState};
use crate::web::api::{ApiError, ServerErrorResponse};
use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskmaster_core::Task;
use utoipa::ToSchema;

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoJson {
    /// Unique identifier assigned by the store
    id: i32,
    /// What needs doing
    title: String,
    /// Optional longer explanation
    description: String,
    /// Whether the task is done
    completed: bool,
    /// One of low, medium or high
    #[schema(example = "medium")]
    priority: String,
    /// When the task was created
    created_at: DateTime<Utc>,
}

impl From<Task> for TodoJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            priority: task.priority.to_string(),
            created_at: task.created_at,
        }
    }
}

/// Request body for creating a todo.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Required, must not be blank
    #[serde(default)]
    title: Option<String>,
    /// Defaults to an empty string
    #[serde(default)]
    description: Option<String>,
    /// Defaults to medium
    #[serde(default)]
    priority: Option<String>,
}

/// Response for a deleted todo.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteTodoResponse {
    message: String,
    todo: TodoJson,
}

/// Handler for GET /api/todos - Returns every todo, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "Successfully retrieved todos", body = Vec<TodoJson>),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn list_todos_handler(
    State(state): State<Arc<TodoState>>,
) -> Result<Json<Vec<TodoJson>>, ApiError> {
    let service = TodoService::new(&state.db);
    let todos = service.list_todos().await?;
    Ok(Json(todos.into_iter().map(TodoJson::from).collect()))
}

/// Handler for POST /api/todos - Creates a todo.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoJson),
        (status = 400, description = "Missing title or unknown priority", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoJson>), ApiError> {
    let Json(request) = payload?;
    let service = TodoService::new(&state.db);
    let task = service
        .create_todo(
            request.title.unwrap_or_default(),
            request.description,
            request.priority,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(TodoJson::from(task))))
}

/// Handler for DELETE /api/todos/{id} - Deletes a todo and echoes it back.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo deleted", body = DeleteTodoResponse),
        (status = 404, description = "Todo not found", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteTodoResponse>, ApiError> {
    let Path(id) = id?;
    let service = TodoService::new(&state.db);
    let task = service.delete_todo(id).await?;
    Ok(Json(DeleteTodoResponse {
        message: "Todo deleted successfully".to_string(),
        todo: TodoJson::from(task),
    }))
}

/// Handler for PATCH /api/todos/{id}/toggle - Flips the completion flag.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    patch,
    path = "/api/todos/{id}/toggle",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo toggled", body = TodoJson),
        (status = 404, description = "Todo not found", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn toggle_todo_handler(
    State(state): State<Arc<TodoState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<TodoJson>, ApiError> {
    let Path(id) = id?;
    let service = TodoService::new(&state.db);
    let task = service.toggle_todo(id).await?;
    Ok(Json(TodoJson::from(task)))
}

/// Creates and returns the todos API router.
pub fn create_api_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos_handler).post(create_todo_handler))
        .route("/todos/{id}", delete(delete_todo_handler))
        .route("/todos/{id}/toggle", patch(toggle_todo_handler))
        .with_state(state)
}
