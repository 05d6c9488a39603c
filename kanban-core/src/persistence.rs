/// Persistence adapter: loads the board snapshot from a storage medium and
/// writes it back.
///
/// - Missing or malformed stored values fall back to a default board
/// - Saves are skipped when the serialized content matches the last write
///   (SHA-256 of the JSON)

use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};

use crate::config::KanbanConfig;
use crate::storage::{BoardStorage, StorageError};
use crate::types::Board;

pub struct PersistenceAdapter {
    storage: Arc<dyn BoardStorage>,
    key: String,
    default_columns: Vec<String>,
    /// SHA-256 of the last value read or written
    last_hash: Mutex<Option<String>>,
}

fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

impl PersistenceAdapter {
    pub fn new(
        storage: Arc<dyn BoardStorage>,
        key: impl Into<String>,
        default_columns: Vec<String>,
    ) -> Self {
        Self {
            storage,
            key: key.into(),
            default_columns,
            last_hash: Mutex::new(None),
        }
    }

    pub fn from_config(storage: Arc<dyn BoardStorage>, config: &KanbanConfig) -> Self {
        Self::new(
            storage,
            config.storage_key.clone(),
            config.default_columns.clone(),
        )
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// A fresh board with the configured column names.
    pub fn default_board(&self) -> Board {
        Board::with_column_names(self.default_columns.iter().cloned())
    }

    /// Load the stored board, or the default board when nothing usable is stored.
    pub fn load(&self) -> Board {
        let content = match self.storage.read(&self.key) {
            Ok(Some(content)) => content,
            Ok(None) => {
                log::info!(
                    target: "kanban.persistence",
                    "No stored board under {:?}, using defaults",
                    self.key
                );
                return self.default_board();
            }
            Err(e) => {
                log::warn!(
                    target: "kanban.persistence",
                    "Failed to read board {:?}: {}, using defaults",
                    self.key,
                    e
                );
                return self.default_board();
            }
        };

        match serde_json::from_str::<Board>(&content) {
            Ok(board) => {
                *self.last_hash.lock().unwrap_or_else(|e| e.into_inner()) =
                    Some(content_hash(&content));
                log::info!(
                    target: "kanban.persistence",
                    "Loaded board {:?}: {} columns, {} tasks",
                    self.key,
                    board.columns.len(),
                    board.task_count()
                );
                board
            }
            Err(e) => {
                log::warn!(
                    target: "kanban.persistence",
                    "Stored board {:?} is malformed: {}, using defaults",
                    self.key,
                    e
                );
                self.default_board()
            }
        }
    }

    /// Serialize and store the full board, overwriting the previous value.
    /// Returns `Ok(false)` when the content was unchanged and nothing was written.
    pub fn save(&self, board: &Board) -> Result<bool, StorageError> {
        let content = serde_json::to_string(board)?;
        let hash = content_hash(&content);

        let mut last_hash = self.last_hash.lock().unwrap_or_else(|e| e.into_inner());
        if last_hash.as_deref() == Some(hash.as_str()) {
            log::debug!(
                target: "kanban.persistence",
                "Board {:?} unchanged, skipping write",
                self.key
            );
            return Ok(false);
        }

        self.storage.write(&self.key, &content)?;
        *last_hash = Some(hash);
        Ok(true)
    }
}
