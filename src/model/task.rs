use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single date-tagged to-do item.
///
/// Field names serialize in camelCase so blobs written by older browser
/// builds (`id`, `text`, `date`, `completed`, `createdAt`) load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation time in milliseconds, bumped on collision
    pub id: i64,
    /// Display text, always trimmed and non-empty
    pub text: String,
    /// Calendar date the task belongs to (`YYYY-MM-DD`)
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    /// Creation instant in the reference zone. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl Task {
    pub fn new(id: i64, text: String, date: NaiveDate, created_at: DateTime<FixedOffset>) -> Self {
        Task {
            id,
            text,
            date,
            completed: false,
            created_at: Some(created_at),
        }
    }
}

/// Named predicate selecting which tasks a list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Today,
    Upcoming,
    Completed,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 4] = [
        TaskFilter::All,
        TaskFilter::Today,
        TaskFilter::Upcoming,
        TaskFilter::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Today => "today",
            TaskFilter::Upcoming => "upcoming",
            TaskFilter::Completed => "completed",
        }
    }

    /// Whether `task` passes this filter when "today" is `reference`
    pub fn matches(self, task: &Task, reference: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Today => task.date == reference,
            TaskFilter::Upcoming => task.date > reference && !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("invalid filter: {} (expected all, today, upcoming, completed)", s))
    }
}
