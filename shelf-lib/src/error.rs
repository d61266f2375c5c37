use shelf_catalog::{GameId, LabelId, TabId};
use shelf_db::{OperationError, StoreError};
use thiserror::Error;

/// Errors returned by library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Store(StoreError),

    #[error("Game id {0} is already taken")]
    IdCollision(GameId),

    #[error("No game with id {0}")]
    UnknownGame(GameId),

    #[error("No label with id {0}")]
    UnknownLabel(LabelId),

    #[error("No tab with id {0}")]
    UnknownTab(TabId),

    #[error("A label named {0:?} already exists")]
    DuplicateLabel(String),

    #[error("A tab named {0:?} already exists")]
    DuplicateTab(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for LibraryError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Operation(OperationError::IdCollision { id, .. }) => Self::IdCollision(id),
            other => Self::Store(other),
        }
    }
}
