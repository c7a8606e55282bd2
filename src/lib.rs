//! # Lanes Core
//!
//! Board state engine for single-board kanban task tracking.
//!
//! Cards live in ordered columns. Every change is a pure `Board -> Board`
//! operation that keeps card status and column membership in lock-step, and a
//! drag reconciler turns pointer drag gestures into exact moves and reorders.
//! Snapshots are persisted through a pluggable store without blocking the
//! caller.

pub mod config;
pub mod domain;
pub mod error;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::{BoardConfig, IdStrategy, LanesConfig, PersistenceConfig};
pub use domain::{
    board::Board,
    card::{Card, CardId},
    column::{Column, ColumnId},
    drag::{DragReconciler, DragState, DropTarget},
    ids::{IdGenerator, SequentialIds, UuidIds},
};
pub use error::{ErrorKind, LanesError, Result};
pub use session::BoardSession;
pub use storage::{FileStore, MemoryStore, SnapshotStore, SnapshotWriter};
