//! Error types for cr-storage

use cr_core::UnitId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store could not be reached or failed the query
    #[error("Rating store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a valid content unit: {0}")]
    InvalidUnit(UnitId),
}

impl StorageError {
    /// True for infrastructure failures the caller may degrade around
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Io(_))
    }
}
