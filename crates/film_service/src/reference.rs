//! Read-only access to genres and MPA ratings.

use std::sync::Arc;

use entities::{Genre, MpaRating};
use film_store::FilmStore;

use crate::{ServiceError, ServiceResult};

/// Lookup service for reference data.
#[derive(Debug)]
pub struct ReferenceCatalog<S> {
    store: Arc<S>,
}

impl<S> Clone for ReferenceCatalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FilmStore> ReferenceCatalog<S> {
    /// Creates a lookup service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists all genres, ordered by identifier.
    pub async fn genres(&self) -> ServiceResult<Vec<Genre>> {
        Ok(self.store.list_genres().await?)
    }

    /// Gets a genre by ID.
    pub async fn genre(&self, id: i64) -> ServiceResult<Genre> {
        self.store
            .get_genre(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Genre", id))
    }

    /// Lists all MPA ratings, ordered by identifier.
    pub async fn mpa_ratings(&self) -> ServiceResult<Vec<MpaRating>> {
        Ok(self.store.list_mpa_ratings().await?)
    }

    /// Gets an MPA rating by ID.
    pub async fn mpa_rating(&self, id: i64) -> ServiceResult<MpaRating> {
        self.store
            .get_mpa_rating(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("MpaRating", id))
    }
}
