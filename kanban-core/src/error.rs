use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum KanbanError {
    #[error("No columns found in host markup; the board cannot start")]
    NoColumns,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, KanbanError>;
