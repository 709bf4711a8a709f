//! Core types for the task snapshot store.

use crate::error::{StoreError, StoreResult};
use crate::store::now;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Lifecycle status of a task.
///
/// Statuses form a total order (Pending → InProgress → Done). `advance` and
/// `revert` saturate at the ends rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Next status in the lifecycle. Advancing from `Done` stays `Done`.
    pub fn advance(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress | TaskStatus::Done => TaskStatus::Done,
        }
    }

    /// Previous status in the lifecycle. Reverting from `Pending` stays `Pending`.
    pub fn revert(self) -> Self {
        match self {
            TaskStatus::Done => TaskStatus::InProgress,
            TaskStatus::InProgress | TaskStatus::Pending => TaskStatus::Pending,
        }
    }

    /// Whether this status ends the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    /// Wire name used in the snapshot file.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Human-readable name for display.
    pub fn display_name(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TaskStatus {
    type Err = StoreError;

    /// Case-insensitive parse accepting common synonyms, for callers that
    /// take status as free text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "PENDING" | "TODO" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" | "INPROGRESS" | "STARTED" => Ok(TaskStatus::InProgress),
            "DONE" | "COMPLETED" => Ok(TaskStatus::Done),
            _ => Err(StoreError::validation(format!(
                "invalid status: {s}. Accepted values: PENDING, IN_PROGRESS, DONE"
            ))),
        }
    }
}

/// A single unit of work tracked by the store.
///
/// `id` and `created_at` are fixed at construction. All other fields change
/// only through the mutators below, which keep `updated_at` fresh and keep
/// `completed_at` present exactly when the status is `Done`.
///
/// Identity is the `id` alone: two tasks with the same id compare equal
/// regardless of their other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: String,
    title: String,
    description: String,
    status: TaskStatus,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    completed_at: Option<NaiveDateTime>,
}

impl Task {
    /// Create a new pending task with a generated id.
    ///
    /// The title is trimmed and must not be empty afterwards.
    pub fn new(title: impl Into<String>) -> StoreResult<Self> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(StoreError::validation("title must not be empty"));
        }
        let created = now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: trimmed.to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            created_at: created,
            updated_at: created,
            completed_at: None,
        })
    }

    // Accessors

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn completed_at(&self) -> Option<NaiveDateTime> {
        self.completed_at
    }

    // Mutators

    /// Replace the title. Trimmed, must not be empty afterwards.
    pub fn set_title(&mut self, title: impl Into<String>) -> StoreResult<()> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(StoreError::validation("title must not be empty"));
        }
        self.title = trimmed.to_string();
        self.touch();
        Ok(())
    }

    /// Replace the description. May be empty.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    /// Set the status, maintaining the completion timestamp.
    ///
    /// Entering `Done` records the completion time; leaving `Done` (or setting
    /// any non-terminal status) clears it.
    pub fn set_status(&mut self, status: TaskStatus) {
        if status.is_terminal() {
            if self.completed_at.is_none() {
                self.completed_at = Some(now());
            }
        } else {
            self.completed_at = None;
        }
        self.status = status;
        self.touch();
    }

    /// Shortcut for `set_status(TaskStatus::Done)`.
    pub fn complete(&mut self) {
        self.set_status(TaskStatus::Done);
    }

    /// Move to the next lifecycle status. No-op once `Done`.
    pub fn advance_status(&mut self) {
        self.set_status(self.status.advance());
    }

    /// Move to the previous lifecycle status. No-op once `Pending`.
    pub fn revert_status(&mut self) {
        self.set_status(self.status.revert());
    }

    // Predicates

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == TaskStatus::InProgress
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    // Display helpers

    /// Title truncated to 60 chars for list views.
    pub fn short_title(&self) -> String {
        truncate(&self.title, 60)
    }

    /// Description truncated to 100 chars for list views.
    pub fn short_description(&self) -> String {
        truncate(&self.description, 100)
    }

    // Store-internal maintenance

    /// Refresh the modification timestamp.
    pub(crate) fn touch(&mut self) {
        self.updated_at = now();
    }

    /// Reject tasks that violate field invariants, before any I/O.
    pub(crate) fn validate(&self) -> StoreResult<()> {
        if self.id.trim().is_empty() {
            return Err(StoreError::validation("id must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(StoreError::validation("title must not be empty"));
        }
        Ok(())
    }

    /// Repair the completion timestamp if it disagrees with the status.
    ///
    /// Tasks built through the mutators never need repair; this covers tasks
    /// deserialized or assembled elsewhere before being handed to the store.
    pub(crate) fn reconcile(&mut self) {
        match (self.status.is_terminal(), self.completed_at) {
            (true, None) => {
                self.completed_at = Some(now());
                self.touch();
            }
            (false, Some(_)) => {
                self.completed_at = None;
                self.touch();
            }
            _ => {}
        }
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.status, self.short_title(), self.id)
    }
}

/// Truncate to `max` chars, appending an ellipsis when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}
