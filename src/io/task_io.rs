use std::collections::HashSet;

use log::{debug, warn};
use serde_json::Value;

use crate::io::blob_store::{BlobStore, StorageError};
use crate::model::task::Task;

/// Serialize the whole collection as one JSON array.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Decode a stored blob leniently.
///
/// Returns the tasks that decoded cleanly plus the number of records
/// dropped. A blob that is not a JSON array yields no tasks. Records are
/// dropped when they lack a required field, carry blank text, or repeat an
/// id seen earlier in the array.
pub fn decode_tasks(blob: &str) -> (Vec<Task>, usize) {
    let records = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!("stored tasks are not a JSON array; starting empty");
            return (Vec::new(), 0);
        }
        Err(e) => {
            warn!("could not parse stored tasks ({}); starting empty", e);
            return (Vec::new(), 0);
        }
    };

    let mut tasks = Vec::with_capacity(records.len());
    let mut seen = HashSet::new();
    let mut dropped = 0;
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Task>(record) {
            Ok(mut task) => {
                let trimmed = task.text.trim();
                if trimmed.is_empty() {
                    warn!("dropping stored task #{}: blank text", index);
                    dropped += 1;
                    continue;
                }
                if !seen.insert(task.id) {
                    warn!("dropping stored task #{}: duplicate id {}", index, task.id);
                    dropped += 1;
                    continue;
                }
                if trimmed.len() != task.text.len() {
                    task.text = trimmed.to_string();
                }
                tasks.push(task);
            }
            Err(e) => {
                warn!("dropping stored task #{}: {}", index, e);
                dropped += 1;
            }
        }
    }
    (tasks, dropped)
}

/// Load the collection stored under `key`. Never fails: an absent blob, a
/// read error, or an undecodable blob all yield an empty collection.
pub fn load_tasks(store: &dyn BlobStore, key: &str) -> Vec<Task> {
    let blob = match store.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!("no stored tasks under '{}'", key);
            return Vec::new();
        }
        Err(e) => {
            warn!("could not read stored tasks: {}", e);
            return Vec::new();
        }
    };
    let (tasks, dropped) = decode_tasks(&blob);
    debug!("loaded {} tasks ({} dropped) from '{}'", tasks.len(), dropped, key);
    tasks
}

/// Overwrite the blob under `key` with the full collection.
pub fn save_tasks(store: &mut dyn BlobStore, key: &str, tasks: &[Task]) -> Result<(), StorageError> {
    let blob = encode_tasks(tasks)?;
    store.set(key, &blob)
}
