//! Film catalog: film records, likes and popularity.

use std::sync::Arc;

use entities::{Film, Genre};
use film_store::FilmStore;

use crate::{ServiceError, ServiceResult};

/// Number of films returned by [`FilmCatalog::popular`] when no count is given.
pub const DEFAULT_POPULAR_COUNT: i64 = 10;

/// Owns film records and their like sets.
#[derive(Debug)]
pub struct FilmCatalog<S> {
    store: Arc<S>,
}

impl<S> Clone for FilmCatalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FilmStore> FilmCatalog<S> {
    /// Creates a catalog over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validates and stores a new film, assigning its identifier.
    pub async fn add(&self, film: Film) -> ServiceResult<Film> {
        film.validate()?;
        let film = self.resolve_references(film).await?;
        let film = self.store.create_film(film).await?;

        tracing::info!(film_id = film.id, name = %film.name, "Film added");
        Ok(film)
    }

    /// Validates and replaces an existing film. The like set is kept.
    pub async fn update(&self, film: Film) -> ServiceResult<Film> {
        self.get(film.id).await?;
        film.validate()?;
        let film = self.resolve_references(film).await?;
        let film = self.store.update_film(film).await?;

        tracing::info!(film_id = film.id, "Film updated");
        Ok(film)
    }

    /// Gets a film by ID.
    pub async fn get(&self, id: i64) -> ServiceResult<Film> {
        self.store
            .get_film(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Film", id))
    }

    /// Lists all films, ordered by identifier.
    pub async fn list_all(&self) -> ServiceResult<Vec<Film>> {
        Ok(self.store.list_films().await?)
    }

    /// Records a like. Liking twice has the effect of liking once.
    ///
    /// Fails with `NotFound` when the film or the user does not exist.
    pub async fn like(&self, film_id: i64, user_id: i64) -> ServiceResult<()> {
        self.store.add_like(film_id, user_id).await?;
        tracing::info!(film_id, user_id, "Film liked");
        Ok(())
    }

    /// Removes a like. Removing an absent like is a no-op; a missing film or
    /// user is `NotFound`.
    pub async fn unlike(&self, film_id: i64, user_id: i64) -> ServiceResult<()> {
        self.store.remove_like(film_id, user_id).await?;
        tracing::info!(film_id, user_id, "Film like removed");
        Ok(())
    }

    /// Returns the most liked films, at most `count` of them.
    ///
    /// Defaults to [`DEFAULT_POPULAR_COUNT`]; zero or negative counts yield
    /// an empty list.
    pub async fn popular(&self, count: Option<i64>) -> ServiceResult<Vec<Film>> {
        let count = count.unwrap_or(DEFAULT_POPULAR_COUNT);
        if count <= 0 {
            return Ok(Vec::new());
        }

        let limit = usize::try_from(count).unwrap_or(usize::MAX);
        let films = self.store.popular_films(limit).await?;
        tracing::debug!(count, returned = films.len(), "Popular films computed");
        Ok(films)
    }

    /// Replaces rating and genre references with the stored records.
    async fn resolve_references(&self, mut film: Film) -> ServiceResult<Film> {
        if let Some(mpa) = &film.mpa {
            let resolved = self
                .store
                .get_mpa_rating(mpa.id)
                .await?
                .ok_or_else(|| ServiceError::not_found("MpaRating", mpa.id))?;
            film.mpa = Some(resolved);
        }

        let mut ids: Vec<i64> = film.genres.iter().map(|g| g.id).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut genres: Vec<Genre> = Vec::with_capacity(ids.len());
        for id in ids {
            let genre = self
                .store
                .get_genre(id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Genre", id))?;
            genres.push(genre);
        }
        film.genres = genres;

        Ok(film)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use entities::{MpaRating, User, ValidationError};
    use film_store::{MemoryFilmStore, SqliteFilmStore};

    use super::*;

    fn catalog() -> FilmCatalog<MemoryFilmStore> {
        FilmCatalog::new(Arc::new(MemoryFilmStore::new()))
    }

    /// Creates a catalog whose store holds users `1..=count`.
    async fn catalog_with_users(count: usize) -> FilmCatalog<MemoryFilmStore> {
        let store = Arc::new(MemoryFilmStore::new());
        for i in 1..=count {
            let user = User::new(format!("user{i}@example.com"), format!("user{i}"));
            store.create_user(user).await.unwrap();
        }
        FilmCatalog::new(store)
    }

    fn film(name: &str) -> Film {
        Film::new(name, NaiveDate::from_ymd_opt(1984, 10, 26).unwrap(), 107)
    }

    #[tokio::test]
    async fn test_add_then_get_round_trip() {
        let catalog = catalog();

        let added = catalog
            .add(film("The Terminator").with_description("I'll be back"))
            .await
            .unwrap();
        let fetched = catalog.get(added.id).await.unwrap();

        assert_eq!(fetched, added);
        assert!(added.likes.is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_films() {
        let catalog = catalog();

        let too_early = Film::new("Arrival", NaiveDate::from_ymd_opt(1895, 12, 27).unwrap(), 1);
        assert!(matches!(
            catalog.add(too_early).await,
            Err(ServiceError::Validation(ValidationError::ReleaseDateTooEarly { .. }))
        ));

        let mut negative = film("Negative");
        negative.duration = -10;
        assert!(matches!(
            catalog.add(negative).await,
            Err(ServiceError::Validation(ValidationError::NonPositiveDuration(-10)))
        ));

        assert!(catalog.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_film() {
        let catalog = catalog();
        assert!(matches!(
            catalog.get(1).await,
            Err(ServiceError::NotFound { entity_type: "Film", .. })
        ));
    }

    #[tokio::test]
    async fn test_references_are_resolved() {
        let catalog = catalog();

        let added = catalog
            .add(
                film("The Terminator")
                    .with_mpa(MpaRating::with_id(4))
                    .with_genres(vec![Genre::with_id(6), Genre::with_id(4), Genre::with_id(6)]),
            )
            .await
            .unwrap();

        assert_eq!(added.mpa, Some(MpaRating::new(4, "R")));
        assert_eq!(
            added.genres,
            vec![Genre::new(4, "Thriller"), Genre::new(6, "Action")]
        );

        let unknown_genre = film("Unknown").with_genres(vec![Genre::with_id(42)]);
        assert!(matches!(
            catalog.add(unknown_genre).await,
            Err(ServiceError::NotFound { entity_type: "Genre", .. })
        ));

        let unknown_mpa = film("Unknown").with_mpa(MpaRating::with_id(9));
        assert!(matches!(
            catalog.add(unknown_mpa).await,
            Err(ServiceError::NotFound { entity_type: "MpaRating", .. })
        ));
    }

    #[tokio::test]
    async fn test_update() {
        let catalog = catalog_with_users(3).await;
        let added = catalog.add(film("The Terminator")).await.unwrap();
        catalog.like(added.id, 3).await.unwrap();

        let mut changed = added.clone();
        changed.name = "Terminator 2".to_string();
        let updated = catalog.update(changed).await.unwrap();
        assert_eq!(updated.name, "Terminator 2");
        assert!(updated.likes.contains(&3));

        let mut invalid = updated.clone();
        invalid.name = String::new();
        assert!(matches!(
            catalog.update(invalid).await,
            Err(ServiceError::Validation(ValidationError::BlankName))
        ));

        let mut ghost = film("Ghost");
        ghost.id = 99;
        assert!(matches!(
            catalog.update(ghost).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_like_is_idempotent() {
        let catalog = catalog_with_users(2).await;
        let added = catalog.add(film("The Terminator")).await.unwrap();

        catalog.like(added.id, 1).await.unwrap();
        let once = catalog.get(added.id).await.unwrap().likes;
        catalog.like(added.id, 1).await.unwrap();
        let twice = catalog.get(added.id).await.unwrap().likes;
        assert_eq!(once, twice);

        catalog.unlike(added.id, 2).await.unwrap();
        assert_eq!(catalog.get(added.id).await.unwrap().likes, once);

        assert!(matches!(
            catalog.like(99, 1).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_popular_counts() {
        let catalog = catalog_with_users(11).await;
        for i in 0..12 {
            let added = catalog.add(film(&format!("Film {i}"))).await.unwrap();
            for user_id in 1..=i {
                catalog.like(added.id, user_id).await.unwrap();
            }
        }

        let default = catalog.popular(None).await.unwrap();
        assert_eq!(default.len(), 10);
        assert_eq!(default[0].name, "Film 11");
        assert!(
            default
                .windows(2)
                .all(|w| w[0].like_count() >= w[1].like_count())
        );

        assert_eq!(catalog.popular(Some(3)).await.unwrap().len(), 3);
        assert_eq!(catalog.popular(Some(50)).await.unwrap().len(), 12);
        assert!(catalog.popular(Some(0)).await.unwrap().is_empty());
        assert!(catalog.popular(Some(-5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_popular_ties_keep_identifier_order() {
        let catalog = catalog_with_users(1).await;
        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            ids.push(catalog.add(film(name)).await.unwrap().id);
        }
        catalog.like(ids[2], 1).await.unwrap();

        let order: Vec<i64> = catalog
            .popular(None)
            .await
            .unwrap()
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(order, vec![ids[2], ids[0], ids[1]]);
    }

    async fn assert_like_needs_user<S: FilmStore>(catalog: FilmCatalog<S>) {
        let added = catalog.add(film("The Terminator")).await.unwrap();

        assert!(matches!(
            catalog.like(added.id, 99).await,
            Err(ServiceError::NotFound { entity_type: "User", .. })
        ));
        assert!(matches!(
            catalog.unlike(added.id, 99).await,
            Err(ServiceError::NotFound { entity_type: "User", .. })
        ));
        assert!(catalog.get(added.id).await.unwrap().likes.is_empty());
    }

    #[tokio::test]
    async fn test_like_from_unknown_user_matches_across_stores() {
        assert_like_needs_user(catalog()).await;

        let store = SqliteFilmStore::connect("sqlite::memory:").await.unwrap();
        assert_like_needs_user(FilmCatalog::new(Arc::new(store))).await;
    }
}
