//! Service error types.

use entities::ValidationError;
use film_store::FilmStoreError;
use thiserror::Error;

/// Errors returned by the catalog, directory and facade.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The store failed unexpectedly.
    #[error("Storage failure: {0}")]
    Internal(FilmStoreError),
}

impl ServiceError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<FilmStoreError> for ServiceError {
    fn from(err: FilmStoreError) -> Self {
        match err {
            FilmStoreError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Internal(other),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
