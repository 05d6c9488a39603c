/// The session a presentation layer drives.
///
/// Holds the current board snapshot together with focus and drag state,
/// turns user intents into board operations, and schedules a debounced save
/// whenever the snapshot changes.

use std::sync::Arc;
use std::time::Duration;

use kanban_core::debounce::DebouncedSaver;
use kanban_core::ops::{self, TaskEdit};
use kanban_core::storage::local::LocalStorage;
use kanban_core::storage::BoardStorage;
use kanban_core::{Board, ColumnId, KanbanConfig, PersistenceAdapter, Position, Task, TaskId};

use crate::config;
use crate::error::SessionError;

pub struct BoardSession {
    board: Board,
    focused: Option<TaskId>,
    dragging: bool,
    drop_position: Option<Position>,
    saver: DebouncedSaver,
}

impl BoardSession {
    /// Load the board through `adapter` and start the save scheduler.
    /// Must be called inside a tokio runtime.
    pub fn open(adapter: Arc<PersistenceAdapter>, quiet: Duration) -> Self {
        let board = adapter.load();
        Self {
            board,
            focused: None,
            dragging: false,
            drop_position: None,
            saver: DebouncedSaver::spawn(adapter, quiet),
        }
    }

    /// Open the board stored on disk under the configured data directory.
    pub fn open_with_config(config: &KanbanConfig) -> Result<Self, SessionError> {
        let dir = config::data_dir(config);
        let storage: Arc<dyn BoardStorage> = Arc::new(LocalStorage::new(&dir)?);
        let adapter = Arc::new(PersistenceAdapter::from_config(storage, config));
        log::info!(
            target: "kanban.session",
            "Opening board {:?} in {}",
            config.storage_key,
            dir.display()
        );
        Ok(Self::open(adapter, config.save_debounce()))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn focused_id(&self) -> Option<&TaskId> {
        self.focused.as_ref()
    }

    /// The focused task, if it still exists on the board.
    pub fn focused_task(&self) -> Option<&Task> {
        self.focused.as_ref().and_then(|id| self.board.find_task(id))
    }

    pub fn focus(&mut self, task_id: TaskId) {
        self.focused = Some(task_id);
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Create an empty task at the end of `column_id` and focus it.
    pub fn create_task(&mut self, column_id: &ColumnId) -> TaskId {
        let (board, task_id) = ops::create_task(&self.board, column_id);
        self.replace(board);
        self.focused = Some(task_id.clone());
        task_id
    }

    pub fn edit_task(&mut self, task_id: &TaskId, edit: TaskEdit) {
        let board = ops::edit_task(&self.board, task_id, |task| edit.apply(task));
        self.replace(board);
    }

    pub fn rename_focused(&mut self, name: impl Into<String>) {
        if let Some(id) = self.focused.clone() {
            self.edit_task(&id, TaskEdit::Name(name.into()));
        }
    }

    pub fn describe_focused(&mut self, description: impl Into<String>) {
        if let Some(id) = self.focused.clone() {
            self.edit_task(&id, TaskEdit::Description(description.into()));
        }
    }

    pub fn delete_task(&mut self, task_id: &TaskId) {
        let board = ops::delete_task(&self.board, task_id);
        self.replace(board);
        if self.focused.as_ref() == Some(task_id) {
            self.focused = None;
        }
    }

    /// Start dragging `task_id`. Grabbing a task also focuses it.
    pub fn begin_drag(&mut self, task_id: TaskId) {
        self.focused = Some(task_id);
        self.dragging = true;
        self.drop_position = None;
    }

    /// Record the insertion point currently under the pointer.
    pub fn set_drop_position(&mut self, position: Position) {
        if self.dragging {
            self.drop_position = Some(position);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn drop_position(&self) -> Option<&Position> {
        self.drop_position.as_ref()
    }

    /// Abandon the drag without moving anything.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Finish a drag: move the focused task to the drop position.
    /// Returns whether a move was applied.
    pub fn drop_focused(&mut self) -> bool {
        let target = match (&self.focused, self.dragging, &self.drop_position) {
            (Some(id), true, Some(position)) => Some((id.clone(), position.clone())),
            _ => None,
        };
        self.dragging = false;

        let Some((task_id, position)) = target else {
            log::debug!(target: "kanban.session", "Drop ignored, no drag in progress");
            return false;
        };
        let board = ops::move_task(&self.board, &task_id, &position);
        self.replace(board);
        true
    }

    /// Write any pending change now.
    pub async fn flush(&self) -> Result<(), SessionError> {
        self.saver.flush().await?;
        Ok(())
    }

    /// Flush pending changes and stop the save scheduler.
    pub async fn close(self) {
        self.saver.shutdown().await;
    }

    fn replace(&mut self, board: Board) {
        if board == self.board {
            return;
        }
        self.board = board;
        if let Err(e) = self.saver.schedule(self.board.clone()) {
            log::error!(target: "kanban.session", "Could not schedule save: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::storage::memory::MemoryStorage;
    use kanban_core::Column;
    use tempfile::TempDir;

    const QUIET: Duration = Duration::from_millis(1000);

    fn seeded_storage() -> Arc<MemoryStorage> {
        let board = Board::new(vec![
            Column::with_id("A", "Todo"),
            Column::with_id("B", "Doing")
                .with_tasks(vec![Task::with_id("t1").named("x"), Task::with_id("t2")]),
        ]);
        let json = serde_json::to_string(&board).unwrap();
        Arc::new(MemoryStorage::new().with_value("kanban-data", &json))
    }

    fn open(storage: Arc<MemoryStorage>) -> (BoardSession, Arc<PersistenceAdapter>) {
        let adapter = Arc::new(PersistenceAdapter::from_config(
            storage,
            &KanbanConfig::default(),
        ));
        (BoardSession::open(adapter.clone(), QUIET), adapter)
    }

    fn column_ids(session: &BoardSession, col: usize) -> Vec<String> {
        session.board().columns[col]
            .tasks
            .iter()
            .map(|t| t.id().to_string())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_focuses_new_task_and_saves() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, adapter) = open(storage.clone());
        assert_eq!(session.board().columns.len(), 4);

        let column = session.board().columns[0].id.clone();
        let id = session.create_task(&column);
        assert_eq!(session.focused_id(), Some(&id));
        assert_eq!(session.focused_task().unwrap().name, "");

        session.rename_focused("Write report");
        session.describe_focused("due friday");
        let task = session.focused_task().unwrap();
        assert_eq!(task.name, "Write report");
        assert_eq!(task.description, "due friday");

        tokio::time::sleep(QUIET * 2).await;
        assert_eq!(storage.write_count(), 1);
        assert_eq!(&adapter.load(), session.board());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drag_and_drop_moves_focused_task() {
        let (mut session, _) = open(seeded_storage());

        session.begin_drag("t2".into());
        assert!(session.is_dragging());
        session.set_drop_position(Position::new("B", 0));
        session.set_drop_position(Position::new("A", 0));
        assert_eq!(session.drop_position(), Some(&Position::new("A", 0)));

        assert!(session.drop_focused());
        assert!(!session.is_dragging());
        assert_eq!(column_ids(&session, 0), vec!["t2"]);
        assert_eq!(column_ids(&session, 1), vec!["t1"]);
        assert_eq!(session.focused_id(), Some(&TaskId::from("t2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_without_target_only_ends_drag() {
        let storage = seeded_storage();
        let (mut session, _) = open(storage.clone());
        let before = session.board().clone();

        session.begin_drag("t1".into());
        assert!(!session.drop_focused());
        assert!(!session.is_dragging());
        assert_eq!(session.board(), &before);

        // Drop positions are ignored outside a drag
        session.set_drop_position(Position::new("A", 0));
        assert!(session.drop_position().is_none());
        assert!(!session.drop_focused());

        session.close().await;
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drag_cancelled_by_end_drag() {
        let (mut session, _) = open(seeded_storage());
        session.begin_drag("t1".into());
        session.set_drop_position(Position::new("A", 0));
        session.end_drag();
        assert!(!session.drop_focused());
        assert_eq!(column_ids(&session, 1), vec!["t1", "t2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_at_end_of_own_column() {
        let (mut session, _) = open(seeded_storage());
        let end = Position::end_of(&session.board().columns[1]);
        session.begin_drag("t1".into());
        session.set_drop_position(end);
        assert!(session.drop_focused());
        assert_eq!(column_ids(&session, 1), vec!["t2", "t1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_focused_task_clears_focus() {
        let (mut session, _) = open(seeded_storage());
        session.focus("t1".into());
        session.delete_task(&"t1".into());
        assert!(session.focused_id().is_none());
        assert_eq!(column_ids(&session, 1), vec!["t2"]);

        session.focus("t2".into());
        session.delete_task(&"missing".into());
        assert_eq!(session.focused_id(), Some(&TaskId::from("t2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_on_missing_task_yields_none() {
        let (mut session, _) = open(seeded_storage());
        session.focus("ghost".into());
        assert!(session.focused_task().is_none());
        session.rename_focused("nothing");
        session.clear_focus();
        assert!(session.focused_id().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_board_schedules_no_save() {
        let storage = seeded_storage();
        let (mut session, _) = open(storage.clone());
        session.edit_task(&"missing".into(), TaskEdit::Name("x".into()));
        session.delete_task(&"missing".into());
        session.flush().await.unwrap();
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_edit() {
        let storage = seeded_storage();
        let (mut session, adapter) = open(storage.clone());
        session.edit_task(&"t1".into(), TaskEdit::Name("renamed".into()));
        let expected = session.board().clone();

        session.close().await;
        assert_eq!(storage.write_count(), 1);
        assert_eq!(adapter.load(), expected);
    }

    #[tokio::test]
    async fn test_open_with_config_persists_to_data_dir() {
        let tmp = TempDir::new().unwrap();
        let config = KanbanConfig {
            data_dir: Some(tmp.path().to_path_buf()),
            save_debounce_ms: 10,
            ..KanbanConfig::default()
        };

        let mut session = BoardSession::open_with_config(&config).unwrap();
        let column = session.board().columns[2].id.clone();
        let id = session.create_task(&column);
        session.close().await;

        let reopened = BoardSession::open_with_config(&config).unwrap();
        assert!(tmp.path().join("kanban-data.json").exists());
        assert_eq!(reopened.board().columns[2].tasks[0].id(), &id);
        assert_eq!(reopened.board().columns[2].name, "In Progress");
        reopened.close().await;
    }
}
