use crate::config::BoardConfig;
use crate::domain::card::{Card, CardId};
use crate::domain::column::{Column, ColumnId};
use crate::domain::ids::IdGenerator;
use crate::error::{LanesError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// How many times a fresh id is drawn before giving up on a generator
const MAX_ID_ATTEMPTS: usize = 16;

/// Kanban board snapshot.
///
/// Every operation takes `&self` and returns a new `Board`; the receiver is
/// never modified, so a failed operation leaves the caller holding exactly the
/// snapshot it started with. The serialized shape (`cards`, `columns`,
/// `columnOrder`) is the persisted wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) cards: HashMap<CardId, Card>,
    pub(crate) columns: HashMap<ColumnId, Column>,
    #[serde(rename = "columnOrder")]
    pub(crate) column_order: Vec<ColumnId>,
}

impl Board {
    /// Creates an empty board with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the built-in board described by the configuration
    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        let mut board = Self::new();

        for seed in &config.columns {
            let id = ColumnId::new(seed.id.clone());
            if board.columns.contains_key(&id) {
                return Err(LanesError::ConfigError(format!(
                    "duplicate column '{}' in board config",
                    id
                )));
            }
            board
                .columns
                .insert(id.clone(), Column::new(id.clone(), seed.title.clone()));
            board.column_order.push(id);
        }

        for seed in &config.cards {
            let id = CardId::new(seed.id.clone());
            let status = ColumnId::new(seed.column.clone());
            if board.cards.contains_key(&id) {
                return Err(LanesError::ConfigError(format!(
                    "duplicate card '{}' in board config",
                    id
                )));
            }
            let column = board.columns.get_mut(&status).ok_or_else(|| {
                LanesError::ConfigError(format!(
                    "card '{}' references unknown column '{}'",
                    id, status
                ))
            })?;
            column.card_ids.push(id.clone());
            board.cards.insert(
                id.clone(),
                Card::new(id, seed.title.clone(), seed.content.clone(), status),
            );
        }

        board
            .validate()
            .map_err(|e| LanesError::ConfigError(e.to_string()))?;
        Ok(board)
    }

    pub fn cards(&self) -> &HashMap<CardId, Card> {
        &self.cards
    }

    pub fn columns(&self) -> &HashMap<ColumnId, Column> {
        &self.columns
    }

    pub fn column_order(&self) -> &[ColumnId] {
        &self.column_order
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.get(id)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in display order
    pub fn columns_in_order(&self) -> impl Iterator<Item = &Column> {
        self.column_order
            .iter()
            .filter_map(|id| self.columns.get(id))
    }

    /// Cards of a column in display order
    pub fn cards_in_column(&self, column_id: &ColumnId) -> Vec<&Card> {
        self.columns
            .get(column_id)
            .map(|column| {
                column
                    .card_ids
                    .iter()
                    .filter_map(|id| self.cards.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The column currently owning a card
    pub fn column_of(&self, card_id: &CardId) -> Option<&ColumnId> {
        self.cards.get(card_id).map(|card| &card.status)
    }

    /// Whether a raw id already names a card or a column
    fn is_id_taken(&self, raw: &str) -> bool {
        self.cards.contains_key(raw) || self.columns.contains_key(raw)
    }

    fn require_card(&self, id: &CardId) -> Result<&Card> {
        self.cards
            .get(id)
            .ok_or_else(|| LanesError::CardNotFound(id.clone()))
    }

    fn require_column(&self, id: &ColumnId) -> Result<&Column> {
        self.columns
            .get(id)
            .ok_or_else(|| LanesError::ColumnNotFound(id.clone()))
    }

    /// Adds a card to the end of a column
    pub fn add_card(
        &self,
        ids: &mut dyn IdGenerator,
        column_id: &ColumnId,
        title: &str,
        content: &str,
    ) -> Result<Board> {
        self.require_column(column_id)?;
        let title = require_text("card title", title)?;
        let content = require_text("card content", content)?;
        let id = fresh_id(|| ids.next_card_id(), |id| self.is_id_taken(id.as_str()))?;

        let mut next = self.clone();
        next.cards.insert(
            id.clone(),
            Card::new(id.clone(), title, content, column_id.clone()),
        );
        if let Some(column) = next.columns.get_mut(column_id) {
            column.card_ids.push(id.clone());
        }

        debug!(card = %id, column = %column_id, "card added");
        Ok(next)
    }

    /// Replaces a card's title and content; its column membership is untouched
    pub fn edit_card(&self, card_id: &CardId, title: &str, content: &str) -> Result<Board> {
        self.require_card(card_id)?;
        let title = require_text("card title", title)?;
        let content = require_text("card content", content)?;

        let mut next = self.clone();
        if let Some(card) = next.cards.get_mut(card_id) {
            card.title = title;
            card.content = content;
        }

        debug!(card = %card_id, "card edited");
        Ok(next)
    }

    /// Removes a card and its reference from the owning column
    pub fn delete_card(&self, card_id: &CardId) -> Result<Board> {
        let status = self.require_card(card_id)?.status.clone();

        let mut next = self.clone();
        next.cards.remove(card_id);
        if let Some(column) = next.columns.get_mut(&status) {
            column.card_ids.retain(|id| id != card_id);
        }

        debug!(card = %card_id, column = %status, "card deleted");
        Ok(next)
    }

    /// Moves a card into `to_column_id` at `destination_index`.
    ///
    /// The index is clamped to `[0, len]` of the destination list as it looks
    /// after the card has been taken out of its source, so a same-column move
    /// is an exact reorder with no index drift.
    pub fn move_card(
        &self,
        card_id: &CardId,
        from_column_id: &ColumnId,
        to_column_id: &ColumnId,
        destination_index: i64,
    ) -> Result<Board> {
        let card = self.require_card(card_id)?;
        let from = self.require_column(from_column_id)?;
        self.require_column(to_column_id)?;

        if &card.status != from_column_id || !from.contains(card_id) {
            return Err(LanesError::InvalidArgument(format!(
                "card '{}' is not in column '{}'",
                card_id, from_column_id
            )));
        }

        let mut next = self.clone();
        if let Some(source) = next.columns.get_mut(from_column_id) {
            source.card_ids.retain(|id| id != card_id);
        }
        let index = match next.columns.get_mut(to_column_id) {
            Some(target) => {
                let index = destination_index.clamp(0, target.len() as i64) as usize;
                target.card_ids.insert(index, card_id.clone());
                index
            }
            None => return Err(LanesError::ColumnNotFound(to_column_id.clone())),
        };
        if let Some(card) = next.cards.get_mut(card_id) {
            card.status = to_column_id.clone();
        }

        debug!(
            card = %card_id,
            from = %from_column_id,
            to = %to_column_id,
            index,
            "card moved"
        );
        Ok(next)
    }

    /// Replaces a column's card ordering with a permutation of itself
    pub fn reorder_cards(&self, column_id: &ColumnId, new_order: &[CardId]) -> Result<Board> {
        let column = self.require_column(column_id)?;

        if !is_permutation(&column.card_ids, new_order) {
            return Err(LanesError::InvalidArgument(format!(
                "new order for column '{}' is not a permutation of its cards",
                column_id
            )));
        }

        let mut next = self.clone();
        if let Some(column) = next.columns.get_mut(column_id) {
            column.card_ids = new_order.to_vec();
        }

        debug!(column = %column_id, "cards reordered");
        Ok(next)
    }

    /// Appends a new, empty column
    pub fn add_column(&self, ids: &mut dyn IdGenerator, title: &str) -> Result<Board> {
        let title = require_text("column title", title)?;
        let id = fresh_id(|| ids.next_column_id(), |id| self.is_id_taken(id.as_str()))?;

        let mut next = self.clone();
        next.columns
            .insert(id.clone(), Column::new(id.clone(), title));
        next.column_order.push(id.clone());

        debug!(column = %id, "column added");
        Ok(next)
    }

    /// Renames a column
    pub fn edit_column(&self, column_id: &ColumnId, title: &str) -> Result<Board> {
        self.require_column(column_id)?;
        let title = require_text("column title", title)?;

        let mut next = self.clone();
        if let Some(column) = next.columns.get_mut(column_id) {
            column.title = title;
        }

        debug!(column = %column_id, "column renamed");
        Ok(next)
    }

    /// Removes an empty column. Columns still holding cards are refused.
    pub fn delete_column(&self, column_id: &ColumnId) -> Result<Board> {
        let column = self.require_column(column_id)?;
        if !column.is_empty() {
            return Err(LanesError::ColumnNotEmpty {
                id: column_id.clone(),
                count: column.len(),
            });
        }

        let mut next = self.clone();
        next.columns.remove(column_id);
        next.column_order.retain(|id| id != column_id);

        debug!(column = %column_id, "column deleted");
        Ok(next)
    }

    /// Checks referential integrity: every card sits in exactly the column its
    /// status names, every column is ordered exactly once, and no id is reused.
    pub fn validate(&self) -> Result<()> {
        for (key, card) in &self.cards {
            if key != &card.id {
                return Err(invalid(format!("card stored under '{}' has id '{}'", key, card.id)));
            }
            if !self.columns.contains_key(&card.status) {
                return Err(invalid(format!(
                    "card '{}' has unknown status '{}'",
                    key, card.status
                )));
            }
            if self.columns.contains_key(key.as_str()) {
                return Err(invalid(format!("id '{}' names both a card and a column", key)));
            }
        }

        let mut placed: HashSet<&CardId> = HashSet::new();
        for (key, column) in &self.columns {
            if key != &column.id {
                return Err(invalid(format!(
                    "column stored under '{}' has id '{}'",
                    key, column.id
                )));
            }
            for card_id in &column.card_ids {
                let card = self.cards.get(card_id).ok_or_else(|| {
                    invalid(format!("column '{}' references missing card '{}'", key, card_id))
                })?;
                if !placed.insert(card_id) {
                    return Err(invalid(format!("card '{}' is listed more than once", card_id)));
                }
                if &card.status != key {
                    return Err(invalid(format!(
                        "card '{}' is listed in '{}' but has status '{}'",
                        card_id, key, card.status
                    )));
                }
            }
        }
        if placed.len() != self.cards.len() {
            return Err(invalid("some cards are not listed in any column".to_string()));
        }

        let mut ordered: HashSet<&ColumnId> = HashSet::new();
        for column_id in &self.column_order {
            if !self.columns.contains_key(column_id) {
                return Err(invalid(format!("column order names missing column '{}'", column_id)));
            }
            if !ordered.insert(column_id) {
                return Err(invalid(format!("column '{}' is ordered more than once", column_id)));
            }
        }
        if ordered.len() != self.columns.len() {
            return Err(invalid("some columns are missing from the column order".to_string()));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> LanesError {
    LanesError::InvalidSnapshot(reason)
}

/// Trims user text and refuses it when nothing is left
fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LanesError::InvalidArgument(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn fresh_id<T>(
    mut draw: impl FnMut() -> Result<T>,
    taken: impl Fn(&T) -> bool,
) -> Result<T> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = draw()?;
        if !taken(&id) {
            return Ok(id);
        }
    }
    Err(LanesError::IdExhausted)
}

fn is_permutation(current: &[CardId], candidate: &[CardId]) -> bool {
    if current.len() != candidate.len() {
        return false;
    }
    let expected: HashSet<&CardId> = current.iter().collect();
    let mut seen: HashSet<&CardId> = HashSet::with_capacity(candidate.len());
    candidate
        .iter()
        .all(|id| expected.contains(id) && seen.insert(id))
}
