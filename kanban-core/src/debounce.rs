/// Debounced board saving.
///
/// Every `schedule` replaces the pending snapshot and restarts the quiet
/// interval. Only when the interval passes without a new snapshot is the
/// pending one handed to the persistence adapter. Rapid edits therefore
/// produce a single write.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::persistence::PersistenceAdapter;
use crate::types::Board;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, thiserror::Error)]
#[error("save scheduler has stopped")]
pub struct SaverStopped;

enum SaveCommand {
    Schedule(Board),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background save task. Must be created inside a tokio runtime.
pub struct DebouncedSaver {
    tx: mpsc::UnboundedSender<SaveCommand>,
    task: JoinHandle<()>,
}

impl DebouncedSaver {
    pub fn spawn(adapter: Arc<PersistenceAdapter>, quiet: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(adapter, quiet, rx));
        Self { tx, task }
    }

    /// Replace the pending snapshot and restart the quiet interval.
    pub fn schedule(&self, board: Board) -> Result<(), SaverStopped> {
        self.tx
            .send(SaveCommand::Schedule(board))
            .map_err(|_| SaverStopped)
    }

    /// Write the pending snapshot now, if any, and wait for it.
    pub async fn flush(&self) -> Result<(), SaverStopped> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(SaveCommand::Flush(done_tx))
            .map_err(|_| SaverStopped)?;
        done_rx.await.map_err(|_| SaverStopped)
    }

    /// Flush anything pending and stop the background task.
    pub async fn shutdown(self) {
        let Self { tx, task } = self;
        drop(tx);
        if let Err(e) = task.await {
            log::error!(target: "kanban.saver", "Save task ended abnormally: {}", e);
        }
    }
}

async fn run(
    adapter: Arc<PersistenceAdapter>,
    quiet: Duration,
    mut rx: mpsc::UnboundedReceiver<SaveCommand>,
) {
    let mut pending: Option<Board> = None;

    loop {
        let command = if pending.is_some() {
            tokio::select! {
                command = rx.recv() => command,
                _ = tokio::time::sleep(quiet) => {
                    if let Some(board) = pending.take() {
                        write(&adapter, &board);
                    }
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(SaveCommand::Schedule(board)) => pending = Some(board),
            Some(SaveCommand::Flush(done)) => {
                if let Some(board) = pending.take() {
                    write(&adapter, &board);
                }
                let _ = done.send(());
            }
            None => {
                if let Some(board) = pending.take() {
                    write(&adapter, &board);
                }
                log::debug!(target: "kanban.saver", "Save scheduler stopped");
                break;
            }
        }
    }
}

fn write(adapter: &PersistenceAdapter, board: &Board) {
    match adapter.save(board) {
        Ok(true) => log::debug!(
            target: "kanban.saver",
            "Saved board {:?} ({} tasks)",
            adapter.key(),
            board.task_count()
        ),
        Ok(false) => {}
        Err(e) => log::error!(
            target: "kanban.saver",
            "Failed to save board {:?}: {}",
            adapter.key(),
            e
        ),
    }
}
