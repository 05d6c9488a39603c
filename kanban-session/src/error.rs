use kanban_core::debounce::SaverStopped;
use kanban_core::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    SaverStopped(#[from] SaverStopped),
}
