//! Session configuration.
//!
//! Everything has a compiled default, so an empty `lanes.toml` (or no file at
//! all) yields the original single-column starter board persisted under the
//! `kanban-data` key.

use crate::error::{LanesError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for a board session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanesConfig {
    pub board: BoardConfig,
    pub persistence: PersistenceConfig,
    pub ids: IdStrategy,
}

impl LanesConfig {
    pub const FILE_NAME: &'static str = "lanes.toml";

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| LanesError::ConfigError(e.to_string()))
    }

    /// Loads configuration from a TOML file, falling back to defaults when the
    /// file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

/// A column present on the built-in board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSeed {
    pub id: String,
    pub title: String,
}

/// A card present on the built-in board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSeed {
    pub id: String,
    pub column: String,
    pub title: String,
    pub content: String,
}

/// Built-in board used when no snapshot has been persisted yet.
///
/// Omitting the `[board]` table keeps the starter board; once the table is
/// present, only the columns and cards it lists are seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_board_name")]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnSeed>,
    #[serde(default)]
    pub cards: Vec<CardSeed>,
}

fn default_board_name() -> String {
    "Default Board".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: default_board_name(),
            columns: vec![ColumnSeed {
                id: "todo".to_string(),
                title: "To Do".to_string(),
            }],
            cards: vec![CardSeed {
                id: "card-1".to_string(),
                column: "todo".to_string(),
                title: "Task 1".to_string(),
                content: "Task description".to_string(),
            }],
        }
    }
}

/// Snapshot persistence tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Storage key the snapshot is written under
    pub key: String,
    /// Pause in submissions required before a queued snapshot is written.
    /// 0 = write immediately.
    pub debounce_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            key: "kanban-data".to_string(),
            debounce_ms: 0,
        }
    }
}

/// How new card and column ids are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    Sequential,
    #[default]
    Uuid,
}
