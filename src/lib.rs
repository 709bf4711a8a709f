//! Task Snapshot Store Library
//!
//! A concurrency-safe record store for task entities, persisted as a single
//! JSON snapshot file. The store serves any number of in-process readers and
//! writers through a reader/writer lock and rewrites the whole snapshot
//! atomically on every mutation.

pub mod error;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use store::{FileTaskStore, TaskStore};
pub use types::{Task, TaskStatus};
