//! Client library for the Taskmaster API.
//!
//! [`ApiClient`] talks to the server. [`TaskBoard`] and [`NoteBoard`] hold what
//! a task or note screen shows and keep it in step with the server.
pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod notes;
pub mod search;

pub use api::{ApiClient, NewTask, NoteApi, NoteDraft, TaskApi};
pub use board::TaskBoard;
pub use config::ClientConfig;
pub use error::ClientError;
pub use notes::NoteBoard;
pub use search::{Debouncer, SEARCH_DEBOUNCE, Ticket};
