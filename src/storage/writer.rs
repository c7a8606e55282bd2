use crate::{
    domain::Board,
    error::{LanesError, Result},
    storage::SnapshotStore,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
struct Pending {
    generation: u64,
    board: Option<Board>,
}

/// Background snapshot persistence.
///
/// Submitting a snapshot never waits on storage. Only the most recent
/// snapshot is kept, so a burst of submissions (a drag sweeping across
/// columns) is written once. With a non-zero debounce the writer waits for
/// that long a pause in submissions before writing. Failed writes are logged and dropped; the
/// in-memory board is never rolled back.
pub struct SnapshotWriter {
    queued: watch::Sender<Pending>,
    attempted: watch::Receiver<u64>,
    generation: u64,
    task: JoinHandle<()>,
}

impl SnapshotWriter {
    /// Starts the writer task. Must be called from within a Tokio runtime.
    pub fn spawn(store: Arc<dyn SnapshotStore>, debounce: Duration) -> Self {
        let (queued, mut queued_rx) = watch::channel(Pending::default());
        let (attempted_tx, attempted) = watch::channel(0u64);

        let task = tokio::spawn(async move {
            while queued_rx.changed().await.is_ok() {
                // Wait until no snapshot has arrived for a full debounce window
                if !debounce.is_zero() {
                    while let Ok(changed) =
                        tokio::time::timeout(debounce, queued_rx.changed()).await
                    {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                let pending = queued_rx.borrow_and_update().clone();
                let Some(board) = pending.board else {
                    continue;
                };

                match store.save(&board).await {
                    Ok(()) => debug!(generation = pending.generation, "snapshot persisted"),
                    Err(e) => warn!(
                        generation = pending.generation,
                        error = %e,
                        "failed to persist board snapshot; keeping in-memory state"
                    ),
                }
                attempted_tx.send_replace(pending.generation);
            }
        });

        Self {
            queued,
            attempted,
            generation: 0,
            task,
        }
    }

    /// Queues a snapshot for persistence, replacing any not yet written
    pub fn submit(&mut self, board: Board) {
        self.generation += 1;
        self.queued.send_replace(Pending {
            generation: self.generation,
            board: Some(board),
        });
    }

    /// Waits until the latest submitted snapshot has been written (or its
    /// write has failed)
    pub async fn flush(&self) -> Result<()> {
        let target = self.generation;
        let mut attempted = self.attempted.clone();
        let reached = attempted
            .wait_for(|generation| *generation >= target)
            .await
            .is_ok();
        if !reached {
            return Err(LanesError::StorageError(
                "snapshot writer stopped".to_string(),
            ));
        }
        Ok(())
    }

    /// Flushes pending work and stops the writer task
    pub async fn shutdown(self) -> Result<()> {
        self.flush().await?;
        let Self { queued, task, .. } = self;
        drop(queued);
        task.await
            .map_err(|e| LanesError::StorageError(format!("snapshot writer failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::domain::{ColumnId, SequentialIds};
    use crate::storage::MemoryStore;

    fn boards(count: usize) -> Vec<Board> {
        let mut board = Board::from_config(&BoardConfig::default()).unwrap();
        let mut ids = SequentialIds::after(&board);
        let mut out = Vec::new();
        for n in 0..count {
            board = board
                .add_card(&mut ids, &ColumnId::from("todo"), &format!("T{}", n), "D")
                .unwrap();
            out.push(board.clone());
        }
        out
    }

    #[tokio::test]
    async fn test_flush_without_submissions() {
        let store = Arc::new(MemoryStore::new());
        let writer = SnapshotWriter::spawn(store.clone(), Duration::ZERO);

        writer.flush().await.unwrap();
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_burst_is_coalesced_to_latest() {
        let store = Arc::new(MemoryStore::new());
        let mut writer = SnapshotWriter::spawn(store.clone(), Duration::ZERO);

        let snapshots = boards(3);
        for board in &snapshots {
            writer.submit(board.clone());
        }
        writer.flush().await.unwrap();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().await.unwrap().unwrap(), snapshots[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_writes() {
        let store = Arc::new(MemoryStore::new());
        let mut writer = SnapshotWriter::spawn(store.clone(), Duration::from_millis(200));

        let snapshots = boards(2);
        writer.submit(snapshots[0].clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        writer.submit(snapshots[1].clone());
        writer.flush().await.unwrap();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().await.unwrap().unwrap(), snapshots[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_waits_for_quiet_period() {
        let store = Arc::new(MemoryStore::new());
        let mut writer = SnapshotWriter::spawn(store.clone(), Duration::from_millis(200));

        let snapshots = boards(3);
        for board in &snapshots {
            writer.submit(board.clone());
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        // Submissions kept arriving inside the window, so nothing is written yet
        assert_eq!(store.save_count(), 0);

        writer.flush().await.unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().await.unwrap().unwrap(), snapshots[2]);
    }

    #[tokio::test]
    async fn test_failed_save_is_not_fatal() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_saves(true);
        let mut writer = SnapshotWriter::spawn(store.clone(), Duration::ZERO);

        let snapshots = boards(2);
        writer.submit(snapshots[0].clone());
        writer.flush().await.unwrap();
        assert_eq!(store.save_count(), 0);

        store.set_fail_saves(false);
        writer.submit(snapshots[1].clone());
        writer.flush().await.unwrap();
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_writes_pending_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let mut writer = SnapshotWriter::spawn(store.clone(), Duration::ZERO);

        let snapshots = boards(1);
        writer.submit(snapshots[0].clone());
        writer.shutdown().await.unwrap();

        assert_eq!(store.save_count(), 1);
    }
}
