use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::note::NoteState;
use crate::todo::TodoState;

pub mod api;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
}

/// Body of the health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the store answered, `error` otherwise
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// `connected` or `disconnected`
    #[serde(rename = "dbStatus")]
    pub db_status: String,
}

/// Connects to the database, checks it answers, then applies pending migrations.
#[tracing::instrument(skip(database_url))]
pub async fn connect_database(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false).connect_lazy(true);
    if database_url.starts_with("sqlite::memory:") {
        // Every pooled connection would otherwise open its own empty database.
        options.max_connections(1);
    }
    let db = Database::connect(options).await?;

    let backend = db.get_database_backend();
    if let Err(err) = db.ping().await {
        tracing::error!("Database connection error: {}", err);
        return Err(anyhow::Error::new(err).context("Database connection error"));
    }
    tracing::info!(?backend, "Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");
    Ok(db)
}

/// Builds the full route table on top of an existing connection.
pub fn create_router(db: Arc<DatabaseConnection>) -> Router {
    let todo_state = Arc::new(TodoState { db: db.clone() });
    let note_state = Arc::new(NoteState { db: db.clone() });
    let app_state = Arc::new(AppState { db });

    Router::new()
        .route("/", axum::routing::get(welcome_handler))
        .merge(api::create_api_router(todo_state, note_state, app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
}

/// Wraps the routes with request tracing and a CORS policy for `cors_origin`.
pub fn create_app(db: Arc<DatabaseConnection>, cors_origin: &str) -> anyhow::Result<Router> {
    let origin: HeaderValue = cors_origin.parse()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Ok(create_router(db).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    ))
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = connect_database(&config.database_url()?).await?;
    let app = create_app(Arc::new(db), &config.cors_origin)?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn welcome_handler() -> &'static str {
    "Taskmaster API is running"
}

/// Handler for GET /api/health - Reports service and database status.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 500, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let timestamp = Utc::now();
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                timestamp,
                db_status: "connected".to_string(),
            }),
        ),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error".to_string(),
                    timestamp,
                    db_status: "disconnected".to_string(),
                }),
            )
        }
    }
}
