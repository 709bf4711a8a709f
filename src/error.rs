//! Structured error types for store operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by record store operations.
///
/// Validation failures are detected before any I/O; conflict and not-found
/// failures are detected after loading the snapshot but before writing, so
/// the file is never left in a partial state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or missing caller input.
    #[error("{0}")]
    Validation(String),

    /// Attempted to save a task whose id is already present.
    #[error("task already exists: {id}")]
    Conflict { id: String },

    /// Attempted to update a task whose id is absent from the store.
    #[error("task not found: {id}")]
    NotFound { id: String },

    /// Underlying I/O failure while loading or storing the snapshot.
    #[error("snapshot persistence failed at {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    // Convenience constructors

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(id: impl Into<String>) -> Self {
        Self::Conflict { id: id.into() }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn persistence(
        path: impl AsRef<Path>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Persistence {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }

    /// Whether this error was caused by caller input rather than the store.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Persistence { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_id() {
        let err = StoreError::conflict("abc-123");
        assert_eq!(err.to_string(), "task already exists: abc-123");

        let err = StoreError::not_found("abc-123");
        assert_eq!(err.to_string(), "task not found: abc-123");
    }

    #[test]
    fn persistence_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::persistence("/tmp/tasks.json", io);
        assert!(err.to_string().contains("/tmp/tasks.json"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_caller_error());
    }

    #[test]
    fn caller_error_classification() {
        assert!(StoreError::validation("id must not be empty").is_caller_error());
        assert!(StoreError::conflict("x").is_caller_error());
        assert!(StoreError::not_found("x").is_caller_error());
    }
}
