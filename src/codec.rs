// JSON encoding of the task sequence in its storage slot

use crate::storage::Storage;
use crate::task::Task;
use eyre::{Context, Result};
use tracing::{debug, warn};

/// Storage key holding the serialized task array
pub const DEFAULT_KEY: &str = "tasks";

/// Serialize the full sequence as a JSON array
pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).context("Failed to serialize tasks")
}

/// Parse a JSON array of tasks
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>> {
    serde_json::from_str(raw).context("Failed to parse stored tasks")
}

/// Load the task sequence stored under `key`
///
/// Never fails: a missing key, a storage read error or a value that does not
/// parse all mean "no tasks yet".
pub fn read_tasks<S: Storage + ?Sized>(storage: &S, key: &str) -> Vec<Task> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "No stored tasks, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(key, error = ?e, "Failed to read stored tasks, starting empty");
            return Vec::new();
        }
    };

    match decode_tasks(&raw) {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(key, error = ?e, "Stored tasks are unreadable, starting empty");
            Vec::new()
        }
    }
}

/// Overwrite the slot under `key` with the full sequence
pub fn write_tasks<S: Storage + ?Sized>(storage: &mut S, key: &str, tasks: &[Task]) -> Result<()> {
    let json = encode_tasks(tasks)?;
    storage
        .set_item(key, &json)
        .with_context(|| format!("Failed to persist tasks under '{}'", key))?;
    debug!(key, count = tasks.len(), "Persisted tasks");
    Ok(())
}
