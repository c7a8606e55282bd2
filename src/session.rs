//! The owned board state for one running session.
//!
//! A `BoardSession` is the only place a snapshot is replaced: every action
//! runs the corresponding board operation, installs the result, and hands it
//! to the background writer. Failed actions leave the installed snapshot as it
//! was.

use crate::config::{IdStrategy, LanesConfig};
use crate::domain::{
    Board, CardId, ColumnId, DragReconciler, DragState, IdGenerator, SequentialIds, UuidIds,
};
use crate::error::{LanesError, Result};
use crate::storage::{SnapshotStore, SnapshotWriter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct BoardSession {
    board: Board,
    ids: Box<dyn IdGenerator + Send>,
    drag: DragReconciler,
    writer: SnapshotWriter,
}

impl BoardSession {
    /// Restores the persisted board, or starts from the configured built-in
    /// board when nothing usable has been stored.
    ///
    /// An unreadable snapshot is logged and left in place until the first
    /// change overwrites it. I/O failures are returned.
    pub async fn open(store: Arc<dyn SnapshotStore>, config: &LanesConfig) -> Result<Self> {
        let board = match store.load().await {
            Ok(Some(board)) => {
                info!(
                    cards = board.card_count(),
                    columns = board.column_count(),
                    "restored board snapshot"
                );
                board
            }
            Ok(None) => {
                info!(board = %config.board.name, "no snapshot stored; using built-in board");
                Board::from_config(&config.board)?
            }
            Err(e @ (LanesError::InvalidSnapshot(_) | LanesError::SerializationError(_))) => {
                warn!(error = %e, "stored snapshot is unusable; using built-in board");
                Board::from_config(&config.board)?
            }
            Err(e) => return Err(e),
        };

        let ids: Box<dyn IdGenerator + Send> = match config.ids {
            IdStrategy::Sequential => Box::new(SequentialIds::after(&board)),
            IdStrategy::Uuid => Box::new(UuidIds),
        };
        let writer = SnapshotWriter::spawn(
            store,
            Duration::from_millis(config.persistence.debounce_ms),
        );

        Ok(Self {
            board,
            ids,
            drag: DragReconciler::new(),
            writer,
        })
    }

    /// Starts a session over an explicit board and id source. Must be called
    /// from within a Tokio runtime.
    pub fn with_board(
        board: Board,
        ids: impl IdGenerator + Send + 'static,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            board,
            ids: Box::new(ids),
            drag: DragReconciler::new(),
            writer: SnapshotWriter::spawn(store, Duration::ZERO),
        }
    }

    /// The current snapshot
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    fn install(&mut self, next: Board) {
        if next != self.board {
            self.writer.submit(next.clone());
            self.board = next;
        }
    }

    fn apply(&mut self, next: Result<Board>) -> Result<&Board> {
        match next {
            Ok(board) => {
                self.install(board);
                Ok(&self.board)
            }
            Err(e) => {
                debug!(error = %e, "board action rejected");
                Err(e)
            }
        }
    }

    pub fn add_card(&mut self, column_id: &ColumnId, title: &str, content: &str) -> Result<&Board> {
        let next = self
            .board
            .add_card(self.ids.as_mut(), column_id, title, content);
        self.apply(next)
    }

    pub fn edit_card(&mut self, card_id: &CardId, title: &str, content: &str) -> Result<&Board> {
        let next = self.board.edit_card(card_id, title, content);
        self.apply(next)
    }

    pub fn delete_card(&mut self, card_id: &CardId) -> Result<&Board> {
        let next = self.board.delete_card(card_id);
        self.apply(next)
    }

    pub fn move_card(
        &mut self,
        card_id: &CardId,
        from_column_id: &ColumnId,
        to_column_id: &ColumnId,
        destination_index: i64,
    ) -> Result<&Board> {
        let next = self
            .board
            .move_card(card_id, from_column_id, to_column_id, destination_index);
        self.apply(next)
    }

    pub fn reorder_cards(&mut self, column_id: &ColumnId, new_order: &[CardId]) -> Result<&Board> {
        let next = self.board.reorder_cards(column_id, new_order);
        self.apply(next)
    }

    pub fn add_column(&mut self, title: &str) -> Result<&Board> {
        let next = self.board.add_column(self.ids.as_mut(), title);
        self.apply(next)
    }

    pub fn edit_column(&mut self, column_id: &ColumnId, title: &str) -> Result<&Board> {
        let next = self.board.edit_column(column_id, title);
        self.apply(next)
    }

    /// Deletes an empty column. `ColumnNotEmpty` is meant to be shown to the
    /// user as a blocking notice.
    pub fn delete_column(&mut self, column_id: &ColumnId) -> Result<&Board> {
        let next = self.board.delete_column(column_id);
        self.apply(next)
    }

    pub fn on_drag_start(&mut self, card_id: CardId) {
        self.drag.on_drag_start(card_id);
    }

    /// Returns whether the hover changed the board
    pub fn on_drag_over(&mut self, card_id: &CardId, target: Option<&str>) -> Result<bool> {
        let next = self.drag.on_drag_over(&self.board, card_id, target)?;
        Ok(self.install_drag(next))
    }

    /// Returns whether the drop changed the board
    pub fn on_drag_end(&mut self, card_id: &CardId, target: Option<&str>) -> Result<bool> {
        let next = self.drag.on_drag_end(&self.board, card_id, target)?;
        Ok(self.install_drag(next))
    }

    pub fn on_drag_cancel(&mut self) {
        self.drag.on_drag_cancel();
    }

    fn install_drag(&mut self, next: Option<Board>) -> bool {
        match next {
            Some(board) if board != self.board => {
                self.install(board);
                true
            }
            _ => false,
        }
    }

    /// Waits for the latest snapshot to reach the store
    pub async fn flush(&self) -> Result<()> {
        self.writer.flush().await
    }

    /// Flushes and stops background persistence
    pub async fn close(self) -> Result<()> {
        self.writer.shutdown().await
    }
}
