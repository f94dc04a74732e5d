use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::blob_store::atomic_write;
use crate::model::calendar::MonthRef;
use crate::model::task::TaskFilter;

/// Persisted view state (written to state.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Filter used by the last `list`
    #[serde(default)]
    pub filter: Option<TaskFilter>,
    /// Month shown by the last `cal`
    #[serde(default)]
    pub calendar: Option<MonthRef>,
}

/// Read state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join("state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    fs::create_dir_all(data_dir)?;
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&data_dir.join("state.json"), content.as_bytes())
}
