//! File-backed store engine.
//!
//! One JSON snapshot file holds the whole collection in insertion order. A
//! reader/writer lock per store instance serializes access: any number of
//! concurrent readers, one exclusive writer. Each operation is a bounded
//! synchronous unit (acquire lock, full read, mutate/inspect, full write for
//! mutations, release) with no internal retries; I/O failures propagate as
//! [`StoreError::Persistence`] after the lock is released.

use super::TaskStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{Task, TaskStatus};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tempfile::NamedTempFile;
use tracing::{debug, trace, warn};

/// Task store persisting to a single JSON snapshot file.
///
/// The lock and file are owned exclusively by this instance; construct one
/// engine per desired store and share it (e.g. behind an `Arc`) rather than
/// opening the same file from several instances.
pub struct FileTaskStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileTaskStore {
    /// Open the store, creating the containing directory and an empty
    /// snapshot file if they do not exist yet, so subsequent reads never see
    /// a missing file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| StoreError::persistence(&path, e))?;
            }
        }
        let store = Self {
            path,
            lock: RwLock::new(()),
        };
        if !store.path.exists() {
            store.write_snapshot(&[])?;
            debug!(path = %store.path.display(), "created empty snapshot");
        }
        Ok(store)
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deserialize the full snapshot.
    ///
    /// A missing or empty file reads as an empty collection. Malformed
    /// content is downgraded to a warning and an empty collection, so one bad
    /// write never wedges the store; the unreadable content is discarded the
    /// next time a mutation rewrites the file.
    fn load_snapshot(&self) -> StoreResult<Vec<Task>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::persistence(&self.path, e)),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&contents) {
            Ok(tasks) => Ok(tasks),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "snapshot is malformed, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Serialize the whole collection to a temporary file in the snapshot's
    /// directory and atomically rename it into place, so readers and crashes
    /// never observe a torn write.
    fn write_snapshot(&self, tasks: &[Task]) -> StoreResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::persistence(&self.path, e))?;
        serde_json::to_writer_pretty(tmp.as_file(), tasks)
            .map_err(|e| StoreError::persistence(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::persistence(&self.path, e.error))?;
        trace!(path = %self.path.display(), tasks = tasks.len(), "snapshot written");
        Ok(())
    }
}

impl TaskStore for FileTaskStore {
    fn save(&self, mut task: Task) -> StoreResult<Task> {
        task.validate()?;
        let _guard = self.lock.write().unwrap();
        let mut tasks = self.load_snapshot()?;
        if tasks.iter().any(|t| t.id() == task.id()) {
            return Err(StoreError::conflict(task.id()));
        }
        task.reconcile();
        tasks.push(task.clone());
        self.write_snapshot(&tasks)?;
        Ok(task)
    }

    fn update(&self, mut task: Task) -> StoreResult<Task> {
        task.validate()?;
        let _guard = self.lock.write().unwrap();
        let mut tasks = self.load_snapshot()?;
        let Some(slot) = tasks.iter_mut().find(|t| t.id() == task.id()) else {
            return Err(StoreError::not_found(task.id()));
        };
        task.reconcile();
        task.touch();
        *slot = task.clone();
        self.write_snapshot(&tasks)?;
        Ok(task)
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        validate_id(id)?;
        let _guard = self.lock.write().unwrap();
        let mut tasks = self.load_snapshot()?;
        let before = tasks.len();
        tasks.retain(|t| t.id() != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.write_snapshot(&tasks)?;
        Ok(true)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Task>> {
        validate_id(id)?;
        let _guard = self.lock.read().unwrap();
        let tasks = self.load_snapshot()?;
        Ok(tasks.into_iter().find(|t| t.id() == id))
    }

    fn find_all(&self) -> StoreResult<Vec<Task>> {
        let _guard = self.lock.read().unwrap();
        self.load_snapshot()
    }

    fn find_by_status(&self, status: TaskStatus) -> StoreResult<Vec<Task>> {
        let _guard = self.lock.read().unwrap();
        let tasks = self.load_snapshot()?;
        Ok(tasks.into_iter().filter(|t| t.status() == status).collect())
    }

    fn find_by_title_containing(&self, keyword: &str) -> StoreResult<Vec<Task>> {
        if keyword.trim().is_empty() {
            return Err(StoreError::validation("keyword must not be empty"));
        }
        let needle = keyword.to_lowercase();
        let _guard = self.lock.read().unwrap();
        let tasks = self.load_snapshot()?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.title().to_lowercase().contains(&needle))
            .collect())
    }

    fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
        validate_id(id)?;
        let _guard = self.lock.read().unwrap();
        Ok(self.load_snapshot()?.iter().any(|t| t.id() == id))
    }

    fn count(&self) -> StoreResult<usize> {
        let _guard = self.lock.read().unwrap();
        Ok(self.load_snapshot()?.len())
    }

    fn delete_all(&self) -> StoreResult<()> {
        let _guard = self.lock.write().unwrap();
        self.write_snapshot(&[])
    }
}

fn validate_id(id: &str) -> StoreResult<()> {
    if id.trim().is_empty() {
        return Err(StoreError::validation("id must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileTaskStore {
        FileTaskStore::open(dir.path().join("tasks.json")).expect("Failed to open store")
    }

    #[test]
    fn open_seeds_empty_snapshot_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.path().exists());
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(serde_json::from_str::<Vec<Task>>(&contents).unwrap().is_empty());
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("tasks.json");
        let store = FileTaskStore::open(&nested).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn load_treats_empty_file_as_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "").unwrap();
        assert!(store.load_snapshot().unwrap().is_empty());
    }

    #[test]
    fn load_treats_malformed_content_as_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json ]").unwrap();
        assert!(store.load_snapshot().unwrap().is_empty());
    }

    #[test]
    fn write_replaces_previous_contents_entirely() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let a = Task::new("a").unwrap();
        let b = Task::new("b").unwrap();
        store.write_snapshot(&[a.clone(), b]).unwrap();
        store.write_snapshot(std::slice::from_ref(&a)).unwrap();
        let tasks = store.load_snapshot().unwrap();
        assert_eq!(tasks, vec![a]);
    }

    #[test]
    fn snapshot_is_a_pretty_printed_json_array() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.write_snapshot(&[Task::new("a").unwrap()]).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.starts_with('['));
        assert!(contents.contains('\n'));
    }
}
