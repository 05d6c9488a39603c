/// Configuration loading for the kanban session.
/// Reads config.json from ~/.config/kanban/config.json (or platform equivalent).

use kanban_core::KanbanConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config path: ~/.config/kanban/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanban")
        .join("config.json")
}

/// Load config from path. Returns default if the file is missing or unreadable.
pub fn load_config(path: &Path) -> KanbanConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!(
                target: "kanban.config",
                "Failed to parse config {}: {}",
                path.display(),
                e
            );
            KanbanConfig::default()
        }),
        Err(_) => {
            log::info!(
                target: "kanban.config",
                "No config at {}, using defaults",
                path.display()
            );
            KanbanConfig::default()
        }
    }
}

/// Directory holding the stored board: the configured override, else
/// ~/.local/share/kanban (or platform equivalent).
pub fn data_dir(config: &KanbanConfig) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kanban")
    })
}

pub fn log_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join("logs").join("kanban.log")
}
