//! Film store error types.

use thiserror::Error;

/// Errors that can occur during film store operations.
#[derive(Debug, Error)]
pub enum FilmStoreError {
    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be decoded.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl FilmStoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Returns true if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for film store operations.
pub type FilmStoreResult<T> = Result<T, FilmStoreError>;
