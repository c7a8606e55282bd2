use crate::{domain::Board, error::Result};
use async_trait::async_trait;

pub mod file_storage;
pub mod memory_storage;
pub mod writer;

pub use file_storage::FileStore;
pub use memory_storage::MemoryStore;
pub use writer::SnapshotWriter;

/// Storage trait for persisting board snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the persisted snapshot, or `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<Board>>;

    /// Persists a snapshot, replacing the previous one
    async fn save(&self, board: &Board) -> Result<()>;
}

/// Parses and validates a serialized snapshot
pub(crate) fn decode_snapshot(contents: &str) -> Result<Board> {
    let board: Board = serde_json::from_str(contents)?;
    board.validate()?;
    Ok(board)
}
