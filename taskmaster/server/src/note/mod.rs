use crate::entities::*;
use sea_orm::*;
use std::sync::Arc;
use taskmaster_core::Note;

pub mod api;

/// State shared by the note handlers.
#[derive(Clone, Debug)]
pub struct NoteState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Error type for NoteService operations.
#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    /// The title was missing or blank.
    #[error("Title is required")]
    EmptyTitle,
    /// No note has the requested ID.
    #[error("Note with ID {0} not found")]
    NoteNotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<note::Model> for Note {
    fn from(model: note::Model) -> Self {
        Note {
            id: model.id,
            title: model.title,
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct NoteService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl NoteService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> NoteService<'_> {
        NoteService { db }
    }

    /// Retrieves all notes, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        tracing::info!("Fetching all notes");
        let notes = note::Entity::find()
            .order_by_desc(note::Column::CreatedAt)
            .order_by_desc(note::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Note::from)
            .collect();
        Ok(notes)
    }

    /// Retrieves a note by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Note` if it exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_note(&self, id: i32) -> Result<Note, NoteServiceError> {
        let note_model = note::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        Ok(Note::from(note_model))
    }

    /// Creates a new note.
    ///
    /// # Arguments
    ///
    /// * `title` - Must contain at least one non-whitespace character.
    /// * `content` - Defaults to an empty string.
    #[tracing::instrument(skip(self, content))]
    pub async fn create_note(
        &self,
        title: String,
        content: Option<String>,
    ) -> Result<Note, NoteServiceError> {
        if title.trim().is_empty() {
            return Err(NoteServiceError::EmptyTitle);
        }

        let now = chrono::Utc::now();
        let active_model = note::ActiveModel {
            title: ActiveValue::Set(title),
            content: ActiveValue::Set(content.unwrap_or_default()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Note::from(created_model))
    }

    /// Replaces the title and content of a note and refreshes `updated_at`.
    ///
    /// A missing `content` clears the stored content; fields are never merged.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Note` if it exists.
    #[tracing::instrument(skip(self, content))]
    pub async fn update_note(
        &self,
        id: i32,
        title: String,
        content: Option<String>,
    ) -> Result<Note, NoteServiceError> {
        if title.trim().is_empty() {
            return Err(NoteServiceError::EmptyTitle);
        }

        let txn = self.db.begin().await?;
        let note_to_update = note::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(NoteServiceError::NoteNotFound(id))?;

        // Clock skew must not move updated_at backwards.
        let updated_at = chrono::Utc::now().max(note_to_update.updated_at);
        let mut active_model: note::ActiveModel = note_to_update.into();
        active_model.title = ActiveValue::Set(title);
        active_model.content = ActiveValue::Set(content.unwrap_or_default());
        active_model.updated_at = ActiveValue::Set(updated_at);
        let updated_model = active_model.update(&txn).await?;
        txn.commit().await?;

        Ok(Note::from(updated_model))
    }

    /// Deletes a note by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Note` if it existed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_note(&self, id: i32) -> Result<Note, NoteServiceError> {
        let txn = self.db.begin().await?;
        let note_to_delete = note::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(NoteServiceError::NoteNotFound(id))?;

        note::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(Note::from(note_to_delete))
    }
}
