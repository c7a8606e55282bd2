use crate::domain::{CardId, ColumnId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LanesError>;

#[derive(Debug, Error)]
pub enum LanesError {
    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    #[error("Column not found: {0}")]
    ColumnNotFound(ColumnId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Column '{id}' still holds {count} card(s). Delete its cards first.")]
    ColumnNotEmpty { id: ColumnId, count: usize },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Id generator kept returning ids already in use")]
    IdExhausted,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse classification the presentation layer uses to pick a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    NotEmpty,
    Storage,
}

impl LanesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CardNotFound(_) | Self::ColumnNotFound(_) => ErrorKind::NotFound,
            Self::InvalidArgument(_) | Self::IdExhausted => ErrorKind::InvalidArgument,
            Self::ColumnNotEmpty { .. } => ErrorKind::NotEmpty,
            Self::InvalidSnapshot(_)
            | Self::StorageError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::ConfigError(_) => ErrorKind::Storage,
        }
    }

    /// Whether the error should be shown to the user as a blocking notice.
    ///
    /// Only a refused column deletion qualifies; the other engine errors are
    /// prevented by disabling controls instead.
    pub fn is_user_notice(&self) -> bool {
        self.kind() == ErrorKind::NotEmpty
    }
}
