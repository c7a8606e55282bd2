use crate::domain::{board::Board, card::CardId, column::ColumnId};
use crate::error::{LanesError, Result};
use uuid::Uuid;

/// Source of fresh card and column identifiers.
///
/// The board re-draws whenever a generator returns an id that is already in
/// use, so implementations only need to be unlikely to collide. A generator
/// that can run dry returns `IdExhausted`.
pub trait IdGenerator {
    fn next_card_id(&mut self) -> Result<CardId>;

    fn next_column_id(&mut self) -> Result<ColumnId>;
}

/// Monotonic counter ids (`card-1`, `column-2`, ...)
///
/// Ids are never reissued within one generator's lifetime. A snapshot only
/// records live ids, so a generator seeded with [`SequentialIds::after`] can
/// hand out again a number whose card or column was deleted in an earlier
/// session. Use [`UuidIds`] when ids must stay unique across restarts.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    /// `None` once the counter has passed `u64::MAX`
    next: Option<u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Starts counting past every numeric suffix still present in the board
    pub fn after(board: &Board) -> Self {
        let card_max = board
            .cards
            .keys()
            .filter_map(|id| numeric_suffix(id.as_str(), CardId::PREFIX));
        let column_max = board
            .columns
            .keys()
            .filter_map(|id| numeric_suffix(id.as_str(), ColumnId::PREFIX));

        let highest = card_max.chain(column_max).max().unwrap_or(0);
        Self {
            next: highest.checked_add(1),
        }
    }

    fn bump(&mut self) -> Result<u64> {
        let n = self.next.ok_or(LanesError::IdExhausted)?;
        self.next = n.checked_add(1);
        Ok(n)
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_card_id(&mut self) -> Result<CardId> {
        Ok(CardId::new(format!("{}{}", CardId::PREFIX, self.bump()?)))
    }

    fn next_column_id(&mut self) -> Result<ColumnId> {
        Ok(ColumnId::new(format!("{}{}", ColumnId::PREFIX, self.bump()?)))
    }
}

/// Random v4 UUID ids (`card-<uuid>`)
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_card_id(&mut self) -> Result<CardId> {
        Ok(CardId::new(format!("{}{}", CardId::PREFIX, Uuid::new_v4())))
    }

    fn next_column_id(&mut self) -> Result<ColumnId> {
        Ok(ColumnId::new(format!("{}{}", ColumnId::PREFIX, Uuid::new_v4())))
    }
}

fn numeric_suffix(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse::<u64>().ok()
}
