//! HTTP access to the Taskmaster API.
//!
//! Boards talk to the server only through [`TaskApi`] and [`NoteApi`], so they
//! can be driven by mocks in tests. [`ApiClient`] is the reqwest-backed
//! implementation of both.

use crate::config::ClientConfig;
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskmaster_core::{Note, Priority, Task};

/// Payload for creating a task. Unset fields take the server defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Title and content of a note, used both to create and to replace one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
        }
    }
}

#[derive(Deserialize)]
struct DeletedTodo {
    todo: Task,
}

#[derive(Deserialize)]
struct DeletedNote {
    note: Note,
}

/// Operations on the task collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetches every task, newest first.
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;

    async fn create_task(&self, task: NewTask) -> Result<Task, ClientError>;

    /// Deletes a task and returns it as it was before removal.
    async fn delete_task(&self, id: i32) -> Result<Task, ClientError>;

    /// Flips the completion flag and returns the updated task.
    async fn toggle_task(&self, id: i32) -> Result<Task, ClientError>;
}

/// Operations on the note collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteApi: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>, ClientError>;

    async fn get_note(&self, id: i32) -> Result<Note, ClientError>;

    async fn create_note(&self, draft: NoteDraft) -> Result<Note, ClientError>;

    /// Replaces title and content. A draft without content clears it.
    async fn update_note(&self, id: i32, draft: NoteDraft) -> Result<Note, ClientError>;

    async fn delete_note(&self, id: i32) -> Result<Note, ClientError>;
}

/// reqwest-backed client for the Taskmaster API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::from_transport)?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let config = ClientConfig::from_env()
            .map_err(|err| ClientError::new(format!("Invalid client configuration: {err}")))?;
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Sends the request and decodes a 2xx JSON body into `T`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|err| {
            tracing::error!("Request to the API failed: {}", err);
            ClientError::from_transport(err)
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(ClientError::from_transport)?;

        if !status.is_success() {
            let err = ClientError::from_response(status.as_u16(), &body);
            tracing::error!(status = status.as_u16(), "API returned an error: {}", err);
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|err| {
            tracing::error!("Malformed response body: {}", err);
            ClientError::with_status(status.as_u16(), "Malformed response from the server")
        })
    }
}

#[async_trait]
impl TaskApi for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.send(self.request(Method::GET, "/todos")).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_task(&self, task: NewTask) -> Result<Task, ClientError> {
        self.send(self.request(Method::POST, "/todos").json(&task))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: i32) -> Result<Task, ClientError> {
        let deleted: DeletedTodo = self
            .send(self.request(Method::DELETE, &format!("/todos/{id}")))
            .await?;
        Ok(deleted.todo)
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_task(&self, id: i32) -> Result<Task, ClientError> {
        self.send(self.request(Method::PATCH, &format!("/todos/{id}/toggle")))
            .await
    }
}

#[async_trait]
impl NoteApi for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn list_notes(&self) -> Result<Vec<Note>, ClientError> {
        self.send(self.request(Method::GET, "/notes")).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_note(&self, id: i32) -> Result<Note, ClientError> {
        self.send(self.request(Method::GET, &format!("/notes/{id}")))
            .await
    }

    #[tracing::instrument(skip(self, draft))]
    async fn create_note(&self, draft: NoteDraft) -> Result<Note, ClientError> {
        self.send(self.request(Method::POST, "/notes").json(&draft))
            .await
    }

    #[tracing::instrument(skip(self, draft))]
    async fn update_note(&self, id: i32, draft: NoteDraft) -> Result<Note, ClientError> {
        self.send(self.request(Method::PUT, &format!("/notes/{id}")).json(&draft))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_note(&self, id: i32) -> Result<Note, ClientError> {
        let deleted: DeletedNote = self
            .send(self.request(Method::DELETE, &format!("/notes/{id}")))
            .await?;
        Ok(deleted.note)
    }
}
