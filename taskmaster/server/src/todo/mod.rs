use crate::entities::sea_orm_active_enums;
use crate::entities::*;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;
use taskmaster_core::{ParsePriorityError, Priority, Task};

pub mod api;

/// State shared by the todo handlers.
#[derive(Clone, Debug)]
pub struct TodoState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Error type for TodoService operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// The title was missing or blank.
    #[error("Title is required")]
    EmptyTitle,
    /// The priority was not one of low, medium or high.
    #[error(transparent)]
    InvalidPriority(#[from] ParsePriorityError),
    /// No todo has the requested ID.
    #[error("Todo with ID {0} not found")]
    TodoNotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<sea_orm_active_enums::Priority> for Priority {
    fn from(priority: sea_orm_active_enums::Priority) -> Self {
        match priority {
            sea_orm_active_enums::Priority::Low => Priority::Low,
            sea_orm_active_enums::Priority::Medium => Priority::Medium,
            sea_orm_active_enums::Priority::High => Priority::High,
        }
    }
}

impl From<Priority> for sea_orm_active_enums::Priority {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => sea_orm_active_enums::Priority::Low,
            Priority::Medium => sea_orm_active_enums::Priority::Medium,
            Priority::High => sea_orm_active_enums::Priority::High,
        }
    }
}

fn task_from_model(model: todo::Model) -> Task {
    Task {
        id: model.id,
        title: model.title,
        description: model.description,
        completed: model.completed,
        priority: model.priority.into(),
        created_at: model.created_at,
    }
}

pub struct TodoService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TodoService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TodoService<'_> {
        TodoService { db }
    }

    /// Retrieves all todos, newest first.
    ///
    /// # Returns
    ///
    /// A `Result` containing every `Task` ordered by creation time descending.
    #[tracing::instrument(skip(self))]
    pub async fn list_todos(&self) -> Result<Vec<Task>, TodoServiceError> {
        let tasks: Vec<Task> = todo::Entity::find()
            .order_by_desc(todo::Column::CreatedAt)
            .order_by_desc(todo::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(task_from_model)
            .collect();

        let count = |priority: Priority| tasks.iter().filter(|t| t.priority == priority).count();
        tracing::info!(
            total = tasks.len(),
            high = count(Priority::High),
            medium = count(Priority::Medium),
            low = count(Priority::Low),
            "Fetched todos with priority breakdown"
        );
        Ok(tasks)
    }

    /// Creates a new todo.
    ///
    /// # Arguments
    ///
    /// * `title` - Must contain at least one non-whitespace character.
    /// * `description` - Defaults to an empty string.
    /// * `priority` - One of `low`, `medium`, `high`; defaults to `medium`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the persisted `Task`, or a validation or database error.
    #[tracing::instrument(skip(self))]
    pub async fn create_todo(
        &self,
        title: String,
        description: Option<String>,
        priority: Option<String>,
    ) -> Result<Task, TodoServiceError> {
        if title.trim().is_empty() {
            return Err(TodoServiceError::EmptyTitle);
        }
        let priority = match priority.as_deref() {
            Some(value) => value.parse::<Priority>()?,
            None => Priority::default(),
        };

        let active_model = todo::ActiveModel {
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description.unwrap_or_default()),
            completed: ActiveValue::Set(false),
            priority: ActiveValue::Set(priority.into()),
            created_at: ActiveValue::Set(chrono::Utc::now()),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!(id = created_model.id, %priority, "Created todo");
        Ok(task_from_model(created_model))
    }

    /// Deletes a todo by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Task` if it existed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_todo(&self, id: i32) -> Result<Task, TodoServiceError> {
        let txn = self.db.begin().await?;
        let todo_to_delete = todo::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(id))?;

        todo::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(task_from_model(todo_to_delete))
    }

    /// Flips the completion flag of a todo with `SET completed = NOT completed`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if it existed.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_todo(&self, id: i32) -> Result<Task, TodoServiceError> {
        let txn = self.db.begin().await?;
        let result = todo::Entity::update_many()
            .col_expr(
                todo::Column::Completed,
                Expr::col(todo::Column::Completed).not(),
            )
            .filter(todo::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(TodoServiceError::TodoNotFound(id));
        }

        let toggled = todo::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(id))?;
        txn.commit().await?;
        Ok(task_from_model(toggled))
    }
}
