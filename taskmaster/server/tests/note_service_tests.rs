use sea_orm::DatabaseConnection;
use taskmaster_server::note::{NoteService, NoteServiceError};

mod common;

pub struct TestContext {
    pub db: DatabaseConnection,
}

async fn setup() -> anyhow::Result<TestContext> {
    let db = common::setup_db().await?;
    Ok(TestContext { db })
}

#[tokio::test]
async fn can_create_note_with_empty_content_by_default() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);

    let note = service
        .create_note("Ideas".to_string(), None)
        .await
        .expect("Failed to create note");

    assert_eq!(note.title, "Ideas");
    assert_eq!(note.content, "");
    assert_eq!(note.created_at, note.updated_at);
}

#[tokio::test]
async fn can_reject_blank_title() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);

    let result = service.create_note(String::new(), Some("body".to_string())).await;

    assert!(matches!(result, Err(NoteServiceError::EmptyTitle)));
    assert!(service.list_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn can_get_note_by_id() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);
    let created = service
        .create_note("Recipe".to_string(), Some("flour, eggs".to_string()))
        .await
        .unwrap();

    let fetched = service.get_note(created.id).await.unwrap();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn can_handle_get_when_note_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);

    let result = service.get_note(42).await;

    assert!(result.is_err());
    if let Err(e) = result {
        assert_eq!(e.to_string(), "Note with ID 42 not found");
    }
}

#[tokio::test]
async fn can_update_note_wholesale_and_refresh_timestamp() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);
    let created = service
        .create_note("Draft".to_string(), Some("old body".to_string()))
        .await
        .unwrap();

    let updated = service
        .update_note(created.id, "Final".to_string(), None)
        .await
        .expect("Failed to update note");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn can_reject_blank_title_on_update_without_changes() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);
    let created = service
        .create_note("Keep".to_string(), Some("body".to_string()))
        .await
        .unwrap();

    let result = service
        .update_note(created.id, " ".to_string(), Some("new".to_string()))
        .await;

    assert!(matches!(result, Err(NoteServiceError::EmptyTitle)));
    assert_eq!(service.get_note(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn can_handle_update_when_note_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);

    let result = service
        .update_note(7, "Title".to_string(), None)
        .await;

    assert!(matches!(result, Err(NoteServiceError::NoteNotFound(7))));
}

#[tokio::test]
async fn can_delete_note_and_list_the_rest_newest_first() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);
    let first = service.create_note("first".to_string(), None).await.unwrap();
    let second = service.create_note("second".to_string(), None).await.unwrap();
    let third = service.create_note("third".to_string(), None).await.unwrap();

    let deleted = service.delete_note(second.id).await.unwrap();
    let remaining: Vec<i32> = service
        .list_notes()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();

    assert_eq!(deleted, second);
    assert_eq!(remaining, vec![third.id, first.id]);
}

#[tokio::test]
async fn can_handle_delete_when_note_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let service = NoteService::new(&state.db);
    service.create_note("only".to_string(), None).await.unwrap();

    let result = service.delete_note(1000).await;

    assert!(matches!(result, Err(NoteServiceError::NoteNotFound(1000))));
    assert_eq!(service.list_notes().await.unwrap().len(), 1);
}
