// tasklist - Task list manager persisted to a key-value storage slot

pub mod codec;
pub mod filter;
pub mod sqlite;
pub mod storage;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use codec::DEFAULT_KEY;
pub use filter::StatusFilter;
pub use sqlite::SqliteStorage;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{BoardView, DraftTarget, EditSession, TaskStore};
pub use task::{DraftField, IdGenerator, Priority, Task, TaskDraft, TaskId, ValidationError, now_ms};
