/// Board configuration shared by the persistence layer and the session.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STORAGE_KEY: &str = "kanban-data";
pub const DEFAULT_COLUMNS: [&str; 4] = ["To Do", "On Hold", "In Progress", "Done"];
pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanConfig {
    /// Name under which the serialized board is stored.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Column names for a fresh board.
    #[serde(default = "default_columns")]
    pub default_columns: Vec<String>,
    /// Quiet period before a pending save is written.
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect()
}

fn default_save_debounce_ms() -> u64 {
    DEFAULT_SAVE_DEBOUNCE_MS
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            default_columns: default_columns(),
            save_debounce_ms: default_save_debounce_ms(),
            data_dir: None,
        }
    }
}

impl KanbanConfig {
    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}
