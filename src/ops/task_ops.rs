use chrono::NaiveDate;
use log::debug;

use crate::io::blob_store::{BlobStore, StorageError};
use crate::io::task_io::{load_tasks, save_tasks};
use crate::model::calendar::CalendarCell;
use crate::model::task::{Task, TaskFilter};
use crate::ops::calendar::month_grid;
use crate::ops::filter::filter_tasks;
use crate::util::date::{Clock, DateError, RefZone, parse_date};

/// Rejected user input on add/edit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("task date is required")]
    MissingDate,
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    MalformedDate(String),
}

impl From<DateError> for ValidationError {
    fn from(e: DateError) -> Self {
        match e {
            DateError::Missing => ValidationError::MissingDate,
            DateError::Malformed(s) => ValidationError::MalformedDate(s),
        }
    }
}

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task not found: {0}")]
    NotFound(i64),
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
    #[error("could not save tasks: {0}")]
    Storage(#[from] StorageError),
}

/// Trim and check user input shared by add and edit.
pub fn validate_input(text: &str, date: &str) -> Result<(String, NaiveDate), ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let date = parse_date(date)?;
    Ok((text.to_string(), date))
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Owns the task collection and writes it back to a [`BlobStore`] after
/// every mutation.
///
/// Tasks keep insertion order; projections sort on top of that order.
pub struct TaskStore<S: BlobStore> {
    store: S,
    key: String,
    zone: RefZone,
    clock: Box<dyn Clock>,
    tasks: Vec<Task>,
}

impl<S: BlobStore> TaskStore<S> {
    /// Load the collection under `key`. Missing or unreadable data starts
    /// an empty collection.
    pub fn load(store: S, key: impl Into<String>, zone: RefZone, clock: Box<dyn Clock>) -> Self {
        let key = key.into();
        let tasks = load_tasks(&store, &key);
        TaskStore {
            store,
            key,
            zone,
            clock,
            tasks,
        }
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn zone(&self) -> RefZone {
        self.zone
    }

    /// Today's date in the reference zone
    pub fn today(&self) -> NaiveDate {
        self.zone.today(self.clock.as_ref())
    }

    /// The underlying blob store
    pub fn backing_store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a task dated `date` and append it.
    pub fn add(&mut self, text: &str, date: &str) -> Result<Task, TaskError> {
        let (text, date) = validate_input(text, date)?;
        let now = self.zone.now(self.clock.as_ref());
        let id = self.next_id(now.timestamp_millis());
        let task = Task::new(id, text, date, now);
        self.tasks.push(task.clone());
        debug!("added task {} on {}", id, task.date);
        self.persist()?;
        Ok(task)
    }

    /// Remove the task with `id`. Absent ids are ignored.
    pub fn delete(&mut self, id: i64) -> Result<(), TaskError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            debug!("deleted task {}", id);
        }
        self.persist()
    }

    /// Flip completion. Returns None when no task has `id`.
    pub fn toggle_complete(&mut self, id: i64) -> Result<Option<Task>, TaskError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.completed = !task.completed;
        let updated = task.clone();
        debug!("task {} completed={}", id, updated.completed);
        self.persist()?;
        Ok(Some(updated))
    }

    /// Replace text and date of an existing task.
    pub fn edit(&mut self, id: i64, text: &str, date: &str) -> Result<Task, TaskError> {
        let (text, date) = validate_input(text, date)?;
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.text = text;
        task.date = date;
        let updated = task.clone();
        debug!("edited task {}", id);
        self.persist()?;
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    /// Tasks passing `filter`, ascending by date, ties in insertion order.
    pub fn list_filtered(&self, filter: TaskFilter, reference: NaiveDate) -> Vec<&Task> {
        filter_tasks(&self.tasks, filter, reference)
    }

    /// The 42-cell grid for `month` (0-based) of `year`.
    pub fn calendar_grid(
        &self,
        year: i32,
        month: u32,
        reference: NaiveDate,
    ) -> Result<Vec<CalendarCell<'_>>, TaskError> {
        month_grid(&self.tasks, year, month, reference)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// `candidate` unless an existing id is at or above it, then one past
    /// the highest id.
    fn next_id(&self, candidate: i64) -> i64 {
        match self.tasks.iter().map(|t| t.id).max() {
            Some(max) if candidate <= max => max.saturating_add(1),
            _ => candidate,
        }
    }

    fn persist(&mut self) -> Result<(), TaskError> {
        save_tasks(&mut self.store, &self.key, &self.tasks)?;
        Ok(())
    }
}
