/// Pure board operations.
///
/// Every operation takes a snapshot by reference and returns a new snapshot.
/// A reference to an unknown task or column is a logged no-op that returns a
/// board equal to the input.

use crate::types::{Board, Column, ColumnId, Position, Task, TaskId};

/// A field-level change to a task's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    Name(String),
    Description(String),
}

impl TaskEdit {
    pub fn apply(self, task: &mut Task) {
        match self {
            TaskEdit::Name(name) => task.name = name,
            TaskEdit::Description(description) => task.description = description,
        }
    }
}

/// Append an empty task to the end of `column_id`.
///
/// The fresh id is returned even when the column does not exist, in which
/// case the board is returned unchanged.
pub fn create_task(board: &Board, column_id: &ColumnId) -> (Board, TaskId) {
    let task = Task::new();
    let task_id = task.id().clone();
    let mut next = board.clone();

    match next.columns.iter_mut().find(|c| &c.id == column_id) {
        Some(column) => column.tasks.push(task),
        None => log::debug!(
            target: "kanban.ops",
            "create_task: column {} not found",
            column_id
        ),
    }

    (next, task_id)
}

/// Remove the task with `task_id` from whichever column holds it.
pub fn delete_task(board: &Board, task_id: &TaskId) -> Board {
    if !board.contains_task(task_id) {
        log::debug!(target: "kanban.ops", "delete_task: task {} not found", task_id);
        return board.clone();
    }

    let mut next = board.clone();
    for column in &mut next.columns {
        column.tasks.retain(|t| t.id() != task_id);
    }
    next
}

/// Apply `mutator` to the task with `task_id` inside a new snapshot.
///
/// The mutator may rewrite name and description. Any change it makes to the
/// id is discarded.
pub fn edit_task<F>(board: &Board, task_id: &TaskId, mutator: F) -> Board
where
    F: FnOnce(&mut Task),
{
    let Some((col_idx, task_idx)) = board.locate_task(task_id) else {
        log::debug!(target: "kanban.ops", "edit_task: task {} not found", task_id);
        return board.clone();
    };

    let mut next = board.clone();
    let task = &mut next.columns[col_idx].tasks[task_idx];
    mutator(&mut *task);
    if task.id() != task_id {
        log::warn!(
            target: "kanban.ops",
            "edit_task: mutator tried to change id of {}, keeping original",
            task_id
        );
        task.reset_id(task_id.clone());
    }
    next
}

/// A slot in a column while a move is in flight.
enum Slot<'a> {
    Existing(&'a Task),
    Moved(Task),
}

/// Relocate `task_id` to `position`.
///
/// `position.index` refers to the target column as it is *before* the move,
/// so it may still count the moving task when source and target are the
/// same column. The tagged copy is inserted first and the original is
/// filtered out afterwards. Indices past the end are clamped to the end.
/// An unknown target column leaves the board unchanged.
pub fn move_task(board: &Board, task_id: &TaskId, position: &Position) -> Board {
    let Some(task) = board.find_task(task_id) else {
        log::debug!(target: "kanban.ops", "move_task: task {} not found", task_id);
        return board.clone();
    };
    let Some(target) = board.column_index(&position.column_id) else {
        log::warn!(
            target: "kanban.ops",
            "move_task: target column {} not found, task {} stays in place",
            position.column_id,
            task_id
        );
        return board.clone();
    };

    let mut slots: Vec<Vec<Slot<'_>>> = board
        .columns
        .iter()
        .map(|c| c.tasks.iter().map(Slot::Existing).collect())
        .collect();

    let target_slots = &mut slots[target];
    let index = position.index.min(target_slots.len());
    if index != position.index {
        log::debug!(
            target: "kanban.ops",
            "move_task: index {} clamped to {} in column {}",
            position.index,
            index,
            position.column_id
        );
    }
    target_slots.insert(index, Slot::Moved(task.clone()));

    let columns = board
        .columns
        .iter()
        .zip(slots)
        .map(|(column, column_slots)| {
            let tasks = column_slots
                .into_iter()
                .filter_map(|slot| match slot {
                    Slot::Existing(t) if t.id() == task_id => None,
                    Slot::Existing(t) => Some(t.clone()),
                    Slot::Moved(t) => Some(t),
                })
                .collect();
            Column {
                id: column.id.clone(),
                name: column.name.clone(),
                tasks,
            }
        })
        .collect();

    Board::new(columns)
}
