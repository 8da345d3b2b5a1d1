use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Importance of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Returns the lowercase wire name of the priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Priority must be one of low, medium or high (got '{0}')")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    pub id: i32,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub completed: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns true if the title or the description contains `term`, ignoring case.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, description: &str) -> Task {
        Task {
            id: 1,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            priority: Priority::Medium,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn can_parse_known_priorities() {
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert_eq!("medium".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
    }

    #[test]
    fn can_reject_unknown_priority() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err, ParsePriorityError("urgent".to_string()));
    }

    #[test]
    fn can_default_priority_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn can_match_title_or_description_ignoring_case() {
        let t = task("Buy Milk", "from the corner shop");

        assert!(t.matches("milk"));
        assert!(t.matches("CORNER"));
        assert!(!t.matches("bread"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn can_serialize_priority_in_lowercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
