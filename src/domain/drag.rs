//! Drag-and-drop reconciliation.
//!
//! A pointer drag arrives as `start → over* → end` (or `cancel`). Hovering a
//! card over a different column moves it there immediately so the board
//! previews the pending placement. Reordering inside one column waits for the
//! drop and is applied as a single array move.

use crate::domain::board::Board;
use crate::domain::card::CardId;
use crate::domain::column::ColumnId;
use crate::error::Result;
use tracing::debug;

/// Lifecycle of a single drag gesture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { card_id: CardId },
}

/// What the pointer is over, resolved against the current board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty area of a column
    Column(ColumnId),
    /// Another card; the drop lands at that card's position
    Card(CardId),
}

impl DropTarget {
    /// Resolves a raw droppable id. Card ids win over column ids; anything
    /// else is outside every droppable region.
    pub fn resolve(board: &Board, raw_id: &str) -> Option<Self> {
        if let Some(card) = board.cards().get(raw_id) {
            return Some(Self::Card(card.id.clone()));
        }
        board
            .columns()
            .get(raw_id)
            .map(|column| Self::Column(column.id.clone()))
    }

    /// The column this target lies in
    pub fn column_id<'a>(&'a self, board: &'a Board) -> Option<&'a ColumnId> {
        match self {
            Self::Column(id) => board.column(id).map(|column| &column.id),
            Self::Card(id) => board.column_of(id),
        }
    }
}

/// Maps drag lifecycle events onto board moves and reorders
#[derive(Debug, Clone, Default)]
pub struct DragReconciler {
    state: DragState,
}

impl DragReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    fn is_dragging(&self, card_id: &CardId) -> bool {
        matches!(&self.state, DragState::Dragging { card_id: active } if active == card_id)
    }

    /// Begins a gesture. Any previous gesture is forgotten.
    pub fn on_drag_start(&mut self, card_id: CardId) {
        debug!(card = %card_id, "drag started");
        self.state = DragState::Dragging { card_id };
    }

    /// Handles the pointer crossing a droppable region.
    ///
    /// Returns the new board when the card was moved into another column,
    /// `None` when the hover does not change anything.
    pub fn on_drag_over(
        &self,
        board: &Board,
        card_id: &CardId,
        target: Option<&str>,
    ) -> Result<Option<Board>> {
        if !self.is_dragging(card_id) {
            debug!(card = %card_id, "drag-over outside an active gesture ignored");
            return Ok(None);
        }
        let Some(target) = target.and_then(|raw| DropTarget::resolve(board, raw)) else {
            return Ok(None);
        };
        let Some(active_column) = board.column_of(card_id) else {
            return Ok(None);
        };
        let Some(over_column) = target.column_id(board) else {
            return Ok(None);
        };
        // Same-column hover is settled on drop
        if over_column == active_column {
            return Ok(None);
        }
        let Some(over) = board.column(over_column) else {
            return Ok(None);
        };

        let index = match &target {
            DropTarget::Column(_) => over.len(),
            DropTarget::Card(over_card) => over.position_of(over_card).unwrap_or(over.len()),
        };

        board
            .move_card(card_id, active_column, over_column, index as i64)
            .map(Some)
    }

    /// Handles the drop. Always ends the gesture.
    ///
    /// Cross-column placement already happened while hovering, so the only
    /// change left is reordering the card within the column it now sits in.
    pub fn on_drag_end(
        &mut self,
        board: &Board,
        card_id: &CardId,
        target: Option<&str>,
    ) -> Result<Option<Board>> {
        let active = self.is_dragging(card_id);
        self.state = DragState::Idle;

        if !active {
            debug!(card = %card_id, "drag-end outside an active gesture ignored");
            return Ok(None);
        }
        let Some(raw) = target else {
            debug!(card = %card_id, "dropped outside any target");
            return Ok(None);
        };
        let Some(column) = board.column_of(card_id).and_then(|id| board.column(id)) else {
            return Ok(None);
        };
        let Some(old_index) = column.position_of(card_id) else {
            return Ok(None);
        };
        let Some(new_index) = column.card_ids.iter().position(|id| id.as_str() == raw) else {
            return Ok(None);
        };
        if old_index == new_index {
            return Ok(None);
        }

        let order = array_move(&column.card_ids, old_index, new_index);
        board.reorder_cards(&column.id, &order).map(Some)
    }

    /// Abandons the gesture. Moves already previewed during hover stay.
    pub fn on_drag_cancel(&mut self) {
        if let DragState::Dragging { card_id } = &self.state {
            debug!(card = %card_id, "drag cancelled");
        }
        self.state = DragState::Idle;
    }
}

/// Moves the element at `from` so that it ends up at `to`, shifting the
/// elements in between.
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if from >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    let to = to.min(moved.len());
    moved.insert(to, item);
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoardConfig, CardSeed, ColumnSeed};

    fn seed_board(columns: &[(&str, &[&str])]) -> Board {
        let config = BoardConfig {
            name: "Drag".to_string(),
            columns: columns
                .iter()
                .map(|(id, _)| ColumnSeed {
                    id: id.to_string(),
                    title: id.to_uppercase(),
                })
                .collect(),
            cards: columns
                .iter()
                .flat_map(|(column, cards)| {
                    cards.iter().map(move |card| CardSeed {
                        id: card.to_string(),
                        column: column.to_string(),
                        title: card.to_string(),
                        content: "body".to_string(),
                    })
                })
                .collect(),
        };
        Board::from_config(&config).unwrap()
    }

    fn order<'a>(board: &'a Board, column: &str) -> Vec<&'a str> {
        board
            .column(&ColumnId::from(column))
            .unwrap()
            .card_ids
            .iter()
            .map(|id| id.as_str())
            .collect()
    }

    #[test]
    fn test_array_move() {
        assert_eq!(array_move(&[1, 2, 3, 4], 0, 2), vec![2, 3, 1, 4]);
        assert_eq!(array_move(&[1, 2, 3, 4], 3, 0), vec![4, 1, 2, 3]);
        assert_eq!(array_move(&[1, 2, 3], 1, 1), vec![1, 2, 3]);
        assert_eq!(array_move(&[1, 2, 3], 5, 0), vec![1, 2, 3]);
    }

    #[test]
    fn test_resolve_targets() {
        let board = seed_board(&[("todo", &["c1"]), ("done", &[])]);

        assert_eq!(
            DropTarget::resolve(&board, "c1"),
            Some(DropTarget::Card(CardId::from("c1")))
        );
        assert_eq!(
            DropTarget::resolve(&board, "done"),
            Some(DropTarget::Column(ColumnId::from("done")))
        );
        assert_eq!(DropTarget::resolve(&board, "nowhere"), None);
    }

    #[test]
    fn test_drag_into_empty_column_area() {
        let board = seed_board(&[("todo", &["c1"]), ("inprogress", &["c9"])]);
        let card = CardId::from("c1");
        let mut drag = DragReconciler::new();

        drag.on_drag_start(card.clone());
        let moved = drag
            .on_drag_over(&board, &card, Some("inprogress"))
            .unwrap()
            .unwrap();
        assert_eq!(order(&moved, "todo"), Vec::<&str>::new());
        assert_eq!(order(&moved, "inprogress"), vec!["c9", "c1"]);

        let dropped = drag
            .on_drag_end(&moved, &card, Some("inprogress"))
            .unwrap();
        assert!(dropped.is_none());
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_over_card_in_other_column_takes_its_index() {
        let board = seed_board(&[("todo", &["c1"]), ("done", &["d1", "d2", "d3"])]);
        let card = CardId::from("c1");
        let mut drag = DragReconciler::new();

        drag.on_drag_start(card.clone());
        let moved = drag
            .on_drag_over(&board, &card, Some("d2"))
            .unwrap()
            .unwrap();

        assert_eq!(order(&moved, "done"), vec!["d1", "c1", "d2", "d3"]);
        assert_eq!(
            moved.card(&card).unwrap().status,
            ColumnId::from("done")
        );
    }

    #[test]
    fn test_repeated_hover_is_a_no_op() {
        let board = seed_board(&[("todo", &["c1"]), ("done", &[])]);
        let card = CardId::from("c1");
        let mut drag = DragReconciler::new();

        drag.on_drag_start(card.clone());
        let moved = drag
            .on_drag_over(&board, &card, Some("done"))
            .unwrap()
            .unwrap();
        assert!(drag
            .on_drag_over(&moved, &card, Some("done"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_same_column_hover_waits_for_drop() {
        let board = seed_board(&[("todo", &["c1", "c2", "c3"])]);
        let card = CardId::from("c1");
        let mut drag = DragReconciler::new();

        drag.on_drag_start(card.clone());
        assert!(drag.on_drag_over(&board, &card, Some("c3")).unwrap().is_none());
        assert!(drag.on_drag_over(&board, &card, Some("todo")).unwrap().is_none());

        let dropped = drag
            .on_drag_end(&board, &card, Some("c3"))
            .unwrap()
            .unwrap();
        assert_eq!(order(&dropped, "todo"), vec!["c2", "c3", "c1"]);
    }

    #[test]
    fn test_drop_moves_card_upwards() {
        let board = seed_board(&[("todo", &["c1", "c2", "c3"])]);
        let card = CardId::from("c3");
        let mut drag = DragReconciler::new();

        drag.on_drag_start(card.clone());
        let dropped = drag
            .on_drag_end(&board, &card, Some("c1"))
            .unwrap()
            .unwrap();
        assert_eq!(order(&dropped, "todo"), vec!["c3", "c1", "c2"]);
    }

    #[test]
    fn test_cross_column_hover_then_reorder_on_drop() {
        let board = seed_board(&[("todo", &["c1"]), ("done", &["d1", "d2"])]);
        let card = CardId::from("c1");
        let mut drag = DragReconciler::new();

        drag.on_drag_start(card.clone());
        let hovered = drag
            .on_drag_over(&board, &card, Some("done"))
            .unwrap()
            .unwrap();
        assert_eq!(order(&hovered, "done"), vec!["d1", "d2", "c1"]);

        let dropped = drag
            .on_drag_end(&hovered, &card, Some("d1"))
            .unwrap()
            .unwrap();
        assert_eq!(order(&dropped, "done"), vec!["c1", "d1", "d2"]);
    }

    #[test]
    fn test_drop_outside_or_onto_itself_is_a_no_op() {
        let board = seed_board(&[("todo", &["c1", "c2"])]);
        let card = CardId::from("c1");
        let mut drag = DragReconciler::new();

        drag.on_drag_start(card.clone());
        assert!(drag.on_drag_over(&board, &card, None).unwrap().is_none());
        assert!(drag.on_drag_over(&board, &card, Some("c1")).unwrap().is_none());
        assert!(drag.on_drag_end(&board, &card, None).unwrap().is_none());
        assert_eq!(drag.state(), &DragState::Idle);

        drag.on_drag_start(card.clone());
        assert!(drag.on_drag_end(&board, &card, Some("c1")).unwrap().is_none());

        drag.on_drag_start(card.clone());
        assert!(drag
            .on_drag_end(&board, &card, Some("unknown"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_events_outside_a_gesture_are_ignored() {
        let board = seed_board(&[("todo", &["c1", "c2"]), ("done", &[])]);
        let mut drag = DragReconciler::new();

        assert!(drag
            .on_drag_over(&board, &CardId::from("c1"), Some("done"))
            .unwrap()
            .is_none());

        drag.on_drag_start(CardId::from("c2"));
        assert!(drag
            .on_drag_over(&board, &CardId::from("c1"), Some("done"))
            .unwrap()
            .is_none());
        assert!(drag
            .on_drag_end(&board, &CardId::from("c1"), Some("c2"))
            .unwrap()
            .is_none());
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut drag = DragReconciler::new();
        drag.on_drag_start(CardId::from("c1"));
        assert!(matches!(drag.state(), DragState::Dragging { .. }));

        drag.on_drag_cancel();
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_restart_forgets_previous_gesture() {
        let board = seed_board(&[("todo", &["c1", "c2"]), ("done", &[])]);
        let mut drag = DragReconciler::new();

        drag.on_drag_start(CardId::from("c1"));
        drag.on_drag_start(CardId::from("c2"));

        assert!(drag
            .on_drag_over(&board, &CardId::from("c1"), Some("done"))
            .unwrap()
            .is_none());
        let moved = drag
            .on_drag_over(&board, &CardId::from("c2"), Some("done"))
            .unwrap()
            .unwrap();
        assert_eq!(order(&moved, "done"), vec!["c2"]);
    }
}
