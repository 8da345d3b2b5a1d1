//! Core domain models and derived-view logic for Taskmaster.
pub mod note;
pub mod stats;
pub mod task;
pub mod view;

pub use note::Note;
pub use stats::TaskStatistics;
pub use task::{ParsePriorityError, Priority, Task};
pub use view::{PriorityFilter, SortKey, StatusFilter, TaskQuery, derive_tasks, search_notes};
