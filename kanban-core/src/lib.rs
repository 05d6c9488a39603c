//! Board model, board operations, and local persistence for a single-user
//! kanban board.
//!
//! The board is a fixed list of columns, each owning an ordered list of
//! tasks. All operations in [`ops`] are pure: they take a snapshot and return
//! a new one. [`persistence::PersistenceAdapter`] loads and stores snapshots
//! as JSON through a [`storage::BoardStorage`] medium, and
//! [`debounce::DebouncedSaver`] coalesces rapid changes into a single write.

pub mod config;
pub mod debounce;
pub mod ops;
pub mod persistence;
pub mod storage;
pub mod types;

pub use config::KanbanConfig;
pub use ops::TaskEdit;
pub use persistence::PersistenceAdapter;
pub use types::{Board, Column, ColumnId, Position, Task, TaskId};
