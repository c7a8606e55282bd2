use crate::domain::column::ColumnId;
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

/// Unique identifier for a card (e.g., card-1, card-42)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub const PREFIX: &'static str = "card-";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for CardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single work item on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub content: String,
    /// The column that currently owns this card
    pub status: ColumnId,
}

impl Card {
    pub fn new(id: CardId, title: String, content: String, status: ColumnId) -> Self {
        Self {
            id,
            title,
            content,
            status,
        }
    }
}
