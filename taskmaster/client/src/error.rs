use serde::Deserialize;
use thiserror::Error;

/// A failed call to the Taskmaster API.
///
/// Transport failures, non-2xx responses and malformed bodies all collapse
/// into this one type. `status` is only set when the server answered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ClientError {
    message: String,
    status: Option<u16>,
}

/// Body the server sends with every non-2xx response.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Builds an error from a non-2xx response, preferring the server's own message.
    pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("Request failed with status {status}"));
        Self::with_status(status, message)
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "The server did not respond in time".to_string()
        } else if err.is_connect() {
            "Unable to reach the server".to_string()
        } else {
            format!("Request failed: {err}")
        };
        match err.status() {
            Some(status) => Self::with_status(status.as_u16(), message),
            None => Self::new(message),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}
