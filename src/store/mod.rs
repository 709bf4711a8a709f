//! Store layer: the record store contract and its file-backed engine.

pub mod file;

pub use file::FileTaskStore;

use crate::error::StoreResult;
use crate::types::{Task, TaskStatus};
use chrono::NaiveDateTime;

/// Contract any task persistence backend must implement.
///
/// Every read returns independent copies of the stored records; mutating a
/// returned value never affects the store's internal state. Implementations
/// must be safe to share across threads within one process.
pub trait TaskStore: Send + Sync {
    /// Store a new task. Fails with [`StoreError::Conflict`] if the id is
    /// already present.
    ///
    /// [`StoreError::Conflict`]: crate::error::StoreError::Conflict
    fn save(&self, task: Task) -> StoreResult<Task>;

    /// Replace an existing task, refreshing its modification timestamp.
    /// Fails with [`StoreError::NotFound`] if the id is absent.
    ///
    /// [`StoreError::NotFound`]: crate::error::StoreError::NotFound
    fn update(&self, task: Task) -> StoreResult<Task>;

    /// Remove a task by id. Returns `false` if the id was absent; removing
    /// the same id twice returns `true` then `false`.
    fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Look up a task by id.
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Task>>;

    /// All tasks in insertion order.
    fn find_all(&self) -> StoreResult<Vec<Task>>;

    /// Tasks with the given status, in insertion order.
    fn find_by_status(&self, status: TaskStatus) -> StoreResult<Vec<Task>>;

    /// Tasks whose title contains the keyword, case-insensitively.
    fn find_by_title_containing(&self, keyword: &str) -> StoreResult<Vec<Task>>;

    /// Whether a task with the given id exists.
    fn exists_by_id(&self, id: &str) -> StoreResult<bool>;

    /// Number of stored tasks.
    fn count(&self) -> StoreResult<usize>;

    /// Remove every task. Irreversible.
    fn delete_all(&self) -> StoreResult<()>;
}

/// Get the current local timestamp.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
