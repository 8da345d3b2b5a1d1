use crate::{Priority, Task};

/// Summary counts shown above a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStatistics {
    pub total: usize,
    pub completed: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TaskStatistics {
    /// Counts completion and priorities over `tasks`.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            if task.completed {
                stats.completed += 1;
            }
            match task.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
            stats
        })
    }

    /// Completed tasks as a rounded percentage of all tasks, 0 when empty.
    pub fn completion_rate(&self) -> u32 {
        percentage(self.completed, self.total)
    }

    /// Tasks of the given priority as a rounded percentage of all tasks.
    pub fn priority_percentage(&self, priority: Priority) -> u32 {
        let count = match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        };
        percentage(count, self.total)
    }
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}
