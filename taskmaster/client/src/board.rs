//! Client-side state behind the task list screen.
//!
//! [`TaskBoard`] keeps the authoritative task list as last fetched from the
//! server plus the query the user has built up, and derives the visible list
//! on demand. Mutations go to the server first and are then applied locally
//! without refetching.

use crate::api::{NewTask, TaskApi};
use crate::error::ClientError;
use crate::search::{Debouncer, Ticket};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use taskmaster_core::{
    PriorityFilter, SortKey, StatusFilter, Task, TaskQuery, TaskStatistics, derive_tasks,
};

pub const LOAD_FAILED: &str = "Failed to load todos. Please try again later.";
pub const SEARCH_FAILED: &str = "Failed to search todos. Please try again.";
pub const ADD_FAILED: &str = "Failed to add todo. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete todo. Please try again.";
pub const TOGGLE_FAILED: &str = "Failed to update todo status. Please try again.";

#[derive(Debug, Default)]
struct BoardState {
    tasks: Vec<Task>,
    query: TaskQuery,
    loading: bool,
    error: Option<String>,
}

fn lock(state: &Mutex<BoardState>) -> MutexGuard<'_, BoardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TaskBoard<A> {
    api: Arc<A>,
    state: Arc<Mutex<BoardState>>,
    search: Debouncer,
    search_input: String,
}

impl<A: TaskApi + 'static> TaskBoard<A> {
    pub fn new(api: A) -> Self {
        Self::with_debounce(api, crate::search::SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(api: A, delay: Duration) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::default(),
            search: Debouncer::new(delay),
            search_input: String::new(),
        }
    }

    /// Replaces the task list with a fresh copy from the server.
    ///
    /// On failure the list is emptied and [`TaskBoard::error`] holds the
    /// message for the failure panel. Retrying is just calling this again.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), ClientError> {
        lock(&self.state).loading = true;
        let result = self.api.list_tasks().await;

        let mut state = lock(&self.state);
        state.loading = false;
        match result {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "Loaded todos");
                state.tasks = tasks;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::error!("Error fetching todos: {}", err);
                state.tasks.clear();
                state.error = Some(LOAD_FAILED.to_string());
                Err(err)
            }
        }
    }

    pub fn set_status_filter(&self, status: StatusFilter) {
        lock(&self.state).query.status = status;
    }

    pub fn set_priority_filter(&self, priority: impl Into<PriorityFilter>) {
        lock(&self.state).query.priority = priority.into();
    }

    pub fn set_sort(&self, sort: SortKey) {
        lock(&self.state).query.sort = sort;
    }

    /// Records a keystroke in the search box.
    ///
    /// A non-blank term refetches and filters the list once the debounce
    /// delay passes with no further keystrokes. A blank term restores the
    /// full list right away.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.search_input = term.clone();

        let api = self.api.clone();
        let state = self.state.clone();
        let job = move |ticket: Ticket| run_search(api, state, term, ticket);

        if self.search_input.trim().is_empty() {
            self.search.run_now(job);
        } else {
            self.search.schedule(job);
        }
    }

    /// What the user last typed, applied or not.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// True while a debounced search has not yet completed.
    pub fn is_searching(&self) -> bool {
        self.search.is_pending()
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_task(&self, task: NewTask) -> Result<Task, ClientError> {
        match self.api.create_task(task).await {
            Ok(created) => {
                let mut state = lock(&self.state);
                state.tasks.insert(0, created.clone());
                state.error = None;
                Ok(created)
            }
            Err(err) => Err(self.fail(ADD_FAILED, err)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: i32) -> Result<Task, ClientError> {
        match self.api.delete_task(id).await {
            Ok(deleted) => {
                let mut state = lock(&self.state);
                state.tasks.retain(|task| task.id != id);
                state.error = None;
                Ok(deleted)
            }
            Err(err) => Err(self.fail(DELETE_FAILED, err)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn toggle_task(&self, id: i32) -> Result<Task, ClientError> {
        match self.api.toggle_task(id).await {
            Ok(updated) => {
                let mut state = lock(&self.state);
                if let Some(task) = state.tasks.iter_mut().find(|task| task.id == id) {
                    *task = updated.clone();
                }
                state.error = None;
                Ok(updated)
            }
            Err(err) => Err(self.fail(TOGGLE_FAILED, err)),
        }
    }

    fn fail(&self, message: &str, err: ClientError) -> ClientError {
        tracing::error!("{}: {}", message, err);
        lock(&self.state).error = Some(message.to_string());
        err
    }

    /// The tasks to display under the current query.
    pub fn visible(&self) -> Vec<Task> {
        let state = lock(&self.state);
        derive_tasks(&state.tasks, &state.query)
    }

    /// Counts over the whole list, ignoring filters.
    pub fn statistics(&self) -> TaskStatistics {
        TaskStatistics::from_tasks(&lock(&self.state).tasks)
    }

    pub fn tasks(&self) -> Vec<Task> {
        lock(&self.state).tasks.clone()
    }

    pub fn query(&self) -> TaskQuery {
        lock(&self.state).query.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }
}

/// Refetches the full list and keeps the tasks matching `term`.
///
/// The response is dropped if another search was scheduled meanwhile.
async fn run_search<A: TaskApi>(
    api: Arc<A>,
    state: Arc<Mutex<BoardState>>,
    term: String,
    ticket: Ticket,
) {
    lock(&state).loading = true;
    let result = api.list_tasks().await;

    if !ticket.is_current() {
        tracing::debug!(term = %term, "Discarding stale search response");
        return;
    }

    let mut state = lock(&state);
    state.loading = false;
    match result {
        Ok(tasks) => {
            let term = term.trim();
            state.tasks = if term.is_empty() {
                tasks
            } else {
                tasks.into_iter().filter(|task| task.matches(term)).collect()
            };
            state.query.search = Some(term.to_string()).filter(|term| !term.is_empty());
            state.error = None;
        }
        Err(err) => {
            tracing::error!("Error searching todos: {}", err);
            state.error = Some(SEARCH_FAILED.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTaskApi;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taskmaster_core::Priority;

    fn task(id: i32, title: &str, priority: Priority) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            completed: false,
            priority,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, id as u32, 0).unwrap(),
        }
    }

    fn titles(tasks: &[Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    fn groceries() -> Vec<Task> {
        vec![
            task(3, "Buy milk", Priority::High),
            task(2, "Bake bread", Priority::Medium),
            task(1, "Milk the cow", Priority::Low),
        ]
    }

    #[tokio::test]
    async fn can_load_tasks_on_refresh() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .times(1)
            .returning(|| Ok(groceries()));
        let board = TaskBoard::new(api);

        board.refresh().await.unwrap();

        assert_eq!(board.tasks().len(), 3);
        assert_eq!(board.error(), None);
        assert!(!board.is_loading());
    }

    #[tokio::test]
    async fn can_clear_list_and_report_when_refresh_fails() {
        let mut api = MockTaskApi::new();
        let mut calls = 0;
        api.expect_list_tasks().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(groceries())
            } else {
                Err(ClientError::new("Unable to reach the server"))
            }
        });
        let board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        let result = board.refresh().await;

        assert!(result.is_err());
        assert!(board.tasks().is_empty());
        assert_eq!(board.error().as_deref(), Some(LOAD_FAILED));
    }

    #[tokio::test]
    async fn can_prepend_created_task_without_refetch() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .times(1)
            .returning(|| Ok(groceries()));
        api.expect_create_task()
            .withf(|new| new.title == "Call mom" && new.priority == Some(Priority::High))
            .times(1)
            .returning(|new| Ok(task(4, &new.title, Priority::High)));
        let board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board
            .add_task(NewTask::new("Call mom").priority(Priority::High))
            .await
            .unwrap();

        assert_eq!(board.tasks()[0].title, "Call mom");
        assert_eq!(board.tasks().len(), 4);
    }

    #[tokio::test]
    async fn can_keep_list_when_create_fails() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .times(1)
            .returning(|| Ok(groceries()));
        api.expect_create_task()
            .returning(|_| Err(ClientError::with_status(400, "Title is required")));
        let board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        let err = board.add_task(NewTask::new("")).await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(board.tasks(), groceries());
        assert_eq!(board.error().as_deref(), Some(ADD_FAILED));
    }

    #[tokio::test]
    async fn can_remove_deleted_task_locally() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .times(1)
            .returning(|| Ok(groceries()));
        api.expect_delete_task()
            .with(eq(2))
            .times(1)
            .returning(|id| Ok(task(id, "Bake bread", Priority::Medium)));
        let board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.delete_task(2).await.unwrap();

        assert_eq!(titles(&board.tasks()), vec!["Buy milk", "Milk the cow"]);
    }

    #[tokio::test]
    async fn can_replace_toggled_task_in_place() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .times(1)
            .returning(|| Ok(groceries()));
        api.expect_toggle_task().with(eq(2)).times(1).returning(|id| {
            let mut toggled = task(id, "Bake bread", Priority::Medium);
            toggled.completed = true;
            Ok(toggled)
        });
        let board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.toggle_task(2).await.unwrap();

        let tasks = board.tasks();
        assert!(tasks[1].completed);
        assert_eq!(tasks[1].id, 2);
        assert_eq!(board.statistics().completed, 1);
    }

    #[tokio::test]
    async fn can_derive_visible_tasks_from_query() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .times(1)
            .returning(|| Ok(groceries()));
        let board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.set_priority_filter(Priority::High);
        assert_eq!(titles(&board.visible()), vec!["Buy milk"]);

        board.set_priority_filter(PriorityFilter::All);
        board.set_sort(SortKey::Alphabetical);
        assert_eq!(
            titles(&board.visible()),
            vec!["Bake bread", "Buy milk", "Milk the cow"]
        );

        board.set_status_filter(StatusFilter::Completed);
        assert!(board.visible().is_empty());
        assert_eq!(board.statistics().total, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn can_debounce_search_keystrokes() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .times(1)
            .returning(|| Ok(groceries()));
        let mut board = TaskBoard::new(api);

        for term in ["m", "mi", "mil", "milk"] {
            board.set_search_term(term);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(board.tasks().is_empty());
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(titles(&board.visible()), vec!["Buy milk", "Milk the cow"]);
        assert_eq!(board.query().search_term(), Some("milk"));
        assert_eq!(board.search_input(), "milk");
    }

    #[tokio::test(start_paused = true)]
    async fn can_restore_full_list_immediately_on_blank_term() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .times(2)
            .returning(|| Ok(groceries()));
        let mut board = TaskBoard::new(api);

        board.set_search_term("bread");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(board.tasks().len(), 1);

        board.set_search_term("");
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(board.tasks().len(), 3);
        assert_eq!(board.query().search, None);
    }

    #[tokio::test(start_paused = true)]
    async fn can_keep_list_when_search_fails() {
        let mut api = MockTaskApi::new();
        let mut calls = 0;
        api.expect_list_tasks().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(groceries())
            } else {
                Err(ClientError::new("The server did not respond in time"))
            }
        });
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.set_search_term("milk");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(board.tasks().len(), 3);
        assert_eq!(board.error().as_deref(), Some(SEARCH_FAILED));
    }

    /// Answers list requests after a per-call delay, so responses can arrive
    /// out of order.
    struct SlowApi {
        calls: AtomicUsize,
        delays: Vec<Duration>,
    }

    #[async_trait]
    impl TaskApi for SlowApi {
        async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delays[call]).await;
            Ok(groceries())
        }

        async fn create_task(&self, _task: NewTask) -> Result<Task, ClientError> {
            unimplemented!()
        }

        async fn delete_task(&self, _id: i32) -> Result<Task, ClientError> {
            unimplemented!()
        }

        async fn toggle_task(&self, _id: i32) -> Result<Task, ClientError> {
            unimplemented!()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn can_ignore_response_of_superseded_search() {
        let api = SlowApi {
            calls: AtomicUsize::new(0),
            delays: vec![Duration::from_secs(2), Duration::ZERO],
        };
        let mut board = TaskBoard::new(api);

        board.set_search_term("milk");
        tokio::time::sleep(Duration::from_millis(700)).await;
        board.set_search_term("bread");
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(titles(&board.tasks()), vec!["Bake bread"]);
        assert_eq!(board.query().search_term(), Some("bread"));
        assert!(!board.is_loading());
    }
}
