use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a task card. Serialized as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

/// Stable identifier of a column. Serialized as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Generate a fresh random identifier (UUID v4).
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(TaskId);
string_id!(ColumnId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    pub name: String,
    pub description: String,
}

impl Task {
    /// A new empty card with a freshly generated id.
    pub fn new() -> Self {
        Self::with_id(TaskId::new())
    }

    pub fn with_id(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Restore the identity after a caller-supplied mutation.
    pub(crate) fn reset_id(&mut self, id: TaskId) {
        self.id = id;
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}

/// A named, ordered bucket of tasks. Task order is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_id(id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }
}

/// The full ordered collection of columns. Stored as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// A board of empty columns with the given names and fresh ids.
    pub fn with_column_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: names.into_iter().map(Column::new).collect(),
        }
    }

    pub fn find_column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == column_id)
    }

    pub fn column_index(&self, column_id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == column_id)
    }

    pub fn find_task(&self, task_id: &TaskId) -> Option<&Task> {
        self.all_tasks().find(|t| t.id() == task_id)
    }

    /// Locate a task as `(column index, task index)`.
    pub fn locate_task(&self, task_id: &TaskId) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(col_idx, col)| {
            col.tasks
                .iter()
                .position(|t| t.id() == task_id)
                .map(|task_idx| (col_idx, task_idx))
        })
    }

    pub fn contains_task(&self, task_id: &TaskId) -> bool {
        self.find_task(task_id).is_some()
    }

    /// All tasks in display order, column by column.
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flat_map(|c| c.tasks.iter())
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.all_tasks().map(Task::id)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

/// Insertion point for a move: before the task currently at `index` in
/// `column_id`, or at the end when `index` equals the column length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub column_id: ColumnId,
    pub index: usize,
}

impl Position {
    pub fn new(column_id: impl Into<ColumnId>, index: usize) -> Self {
        Self {
            column_id: column_id.into(),
            index,
        }
    }

    /// The drop target below the last task of a column.
    pub fn end_of(column: &Column) -> Self {
        Self {
            column_id: column.id.clone(),
            index: column.tasks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board() -> Board {
        Board::new(vec![
            Column::with_id("A", "Todo"),
            Column::with_id("B", "Done").with_tasks(vec![
                Task::with_id("t1").named("x"),
                Task::with_id("t2").named("y").described("details"),
            ]),
        ])
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_new_task_is_empty() {
        let task = Task::new();
        assert_eq!(task.name, "");
        assert_eq!(task.description, "");
    }

    #[test]
    fn test_board_lookups() {
        let board = sample_board();
        assert_eq!(board.task_count(), 2);
        assert_eq!(board.column_index(&"B".into()), Some(1));
        assert_eq!(board.locate_task(&"t2".into()), Some((1, 1)));
        assert!(board.contains_task(&"t1".into()));
        assert!(!board.contains_task(&"missing".into()));
        assert!(board.find_column(&"nope".into()).is_none());
        let ids: Vec<&str> = board.task_ids().map(TaskId::as_str).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn test_board_serializes_as_column_array() {
        let board = sample_board();
        let json = serde_json::to_value(&board).unwrap();
        assert!(json.is_array());
        assert_eq!(json[1]["id"], "B");
        assert_eq!(json[1]["tasks"][1]["description"], "details");
        assert_eq!(json[0]["tasks"], serde_json::json!([]));
    }

    #[test]
    fn test_board_reads_stored_layout() {
        let json = r#"[
            {"id": "c1", "name": "Todo", "tasks": [{"id": "t1", "name": "x", "description": ""}]},
            {"id": "c2", "name": "Done", "tasks": []}
        ]"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.columns.len(), 2);
        assert_eq!(board.columns[0].tasks[0].id().as_str(), "t1");
    }

    #[test]
    fn test_position_end_of() {
        let board = sample_board();
        let pos = Position::end_of(&board.columns[1]);
        assert_eq!(pos, Position::new("B", 2));
        let json = serde_json::to_value(&pos).unwrap();
        assert_eq!(json["columnId"], "B");
    }
}
