use crate::api::{NoteApi, NoteDraft};
use crate::error::ClientError;
use taskmaster_core::{Note, search_notes};

pub const LOAD_FAILED: &str = "Failed to load notes. Please try again later.";
pub const OPEN_FAILED: &str = "Failed to load note. Please try again.";
pub const SAVE_FAILED: &str = "Failed to save note. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete note. Please try again.";

/// Client-side state behind the notes screen.
///
/// Searching is local and immediate: the query only narrows what
/// [`NoteBoard::visible`] returns and never hits the server.
pub struct NoteBoard<A> {
    api: A,
    notes: Vec<Note>,
    search_query: String,
    loading: bool,
    error: Option<String>,
}

impl<A: NoteApi> NoteBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            notes: Vec::new(),
            search_query: String::new(),
            loading: false,
            error: None,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.api.list_notes().await;
        self.loading = false;
        match result {
            Ok(notes) => {
                self.notes = notes;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.notes.clear();
                Err(self.fail(LOAD_FAILED, err))
            }
        }
    }

    /// Fetches one note for editing. The list is left as it is.
    #[tracing::instrument(skip(self))]
    pub async fn open(&mut self, id: i32) -> Result<Note, ClientError> {
        let result = self.api.get_note(id).await;
        result.map_err(|err| self.fail(OPEN_FAILED, err))
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn add_note(&mut self, draft: NoteDraft) -> Result<Note, ClientError> {
        let result = self.api.create_note(draft).await;
        let created = result.map_err(|err| self.fail(SAVE_FAILED, err))?;
        self.notes.insert(0, created.clone());
        self.error = None;
        Ok(created)
    }

    /// Replaces a note on the server and swaps it into the list where it was.
    #[tracing::instrument(skip(self, draft))]
    pub async fn save_note(&mut self, id: i32, draft: NoteDraft) -> Result<Note, ClientError> {
        let result = self.api.update_note(id, draft).await;
        let updated = result.map_err(|err| self.fail(SAVE_FAILED, err))?;
        if let Some(note) = self.notes.iter_mut().find(|note| note.id == id) {
            *note = updated.clone();
        }
        self.error = None;
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_note(&mut self, id: i32) -> Result<Note, ClientError> {
        let result = self.api.delete_note(id).await;
        let deleted = result.map_err(|err| self.fail(DELETE_FAILED, err))?;
        self.notes.retain(|note| note.id != id);
        self.error = None;
        Ok(deleted)
    }

    fn fail(&mut self, message: &str, err: ClientError) -> ClientError {
        tracing::error!("{}: {}", message, err);
        self.error = Some(message.to_string());
        err
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Notes matching the search query, in list order.
    pub fn visible(&self) -> Vec<Note> {
        search_notes(&self.notes, &self.search_query)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
