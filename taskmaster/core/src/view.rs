//! Derived views over the authoritative task and note lists.
//!
//! Derivation never touches its input: callers keep the full list and ask for
//! a fresh projection whenever the query changes.

use crate::{Note, Priority, Task};
use icu_normalizer::DecomposingNormalizerBorrowed;
use std::cmp::Ordering;

/// Completion status a task list can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    fn accepts(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

/// Priority a task list can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    fn accepts(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => *wanted == priority,
        }
    }
}

impl From<Priority> for PriorityFilter {
    fn from(priority: Priority) -> Self {
        PriorityFilter::Only(priority)
    }
}

/// Ordering applied as the last derivation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Alphabetical,
}

impl SortKey {
    fn sort(&self, tasks: &mut [Task]) {
        match self {
            SortKey::Newest => {
                tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
            }
            SortKey::Oldest => {
                tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            }
            SortKey::Alphabetical => tasks.sort_by(|a, b| collate(&a.title, &b.title)),
        }
    }
}

/// Locale-like title comparison.
///
/// Base letters decide first, ignoring accents and case. Remaining ties put
/// the unaccented spelling first, then the lowercase one.
fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Lowercases `s` and strips the accents NFD splits off its letters.
fn base_letters(s: &str) -> String {
    DecomposingNormalizerBorrowed::new_nfd()
        .normalize(s)
        .chars()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Everything that shapes the derived task list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskQuery {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort: SortKey,
    pub search: Option<String>,
}

impl TaskQuery {
    /// The active search term, if a non-blank one is set.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Applies status filter, priority filter, search and sort, in that order.
pub fn derive_tasks(tasks: &[Task], query: &TaskQuery) -> Vec<Task> {
    let term = query.search_term();
    let mut derived: Vec<Task> = tasks
        .iter()
        .filter(|task| query.status.accepts(task))
        .filter(|task| query.priority.accepts(task.priority))
        .filter(|task| term.is_none_or(|term| task.matches(term)))
        .cloned()
        .collect();
    query.sort.sort(&mut derived);
    derived
}

/// Returns the notes whose title or content contains `query`, in list order.
pub fn search_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let query = query.trim();
    notes
        .iter()
        .filter(|note| query.is_empty() || note.matches(query))
        .cloned()
        .collect()
}
