//! Operations that span films and users.

use std::sync::Arc;

use entities::{Film, User, ValidationError};
use film_store::FilmStore;

use crate::{FilmCatalog, ReferenceCatalog, ServiceResult, UserDirectory};

/// Entry point for callers.
///
/// Wraps the [`FilmCatalog`] and [`UserDirectory`] that share one store and
/// checks that every film and user an operation names exists before the
/// operation is delegated.
#[derive(Debug)]
pub struct RatingFacade<S> {
    films: FilmCatalog<S>,
    users: UserDirectory<S>,
    reference: ReferenceCatalog<S>,
}

impl<S> Clone for RatingFacade<S> {
    fn clone(&self) -> Self {
        Self {
            films: self.films.clone(),
            users: self.users.clone(),
            reference: self.reference.clone(),
        }
    }
}

impl<S: FilmStore> RatingFacade<S> {
    /// Creates a facade with a catalog and directory over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            films: FilmCatalog::new(Arc::clone(&store)),
            users: UserDirectory::new(Arc::clone(&store)),
            reference: ReferenceCatalog::new(store),
        }
    }

    /// Returns the film catalog.
    pub fn films(&self) -> &FilmCatalog<S> {
        &self.films
    }

    /// Returns the user directory.
    pub fn users(&self) -> &UserDirectory<S> {
        &self.users
    }

    /// Returns the genre and MPA rating lookups.
    pub fn reference(&self) -> &ReferenceCatalog<S> {
        &self.reference
    }

    // =========================================================================
    // Likes
    // =========================================================================

    /// Records that a user likes a film, after checking both exist.
    pub async fn like(&self, film_id: i64, user_id: i64) -> ServiceResult<()> {
        self.films.get(film_id).await?;
        self.users.get(user_id).await?;
        self.films.like(film_id, user_id).await
    }

    /// Removes a user's like from a film, after checking both exist.
    pub async fn unlike(&self, film_id: i64, user_id: i64) -> ServiceResult<()> {
        self.films.get(film_id).await?;
        self.users.get(user_id).await?;
        self.films.unlike(film_id, user_id).await
    }

    /// See [`FilmCatalog::popular`].
    pub async fn popular_films(&self, count: Option<i64>) -> ServiceResult<Vec<Film>> {
        self.films.popular(count).await
    }

    // =========================================================================
    // Friendships
    // =========================================================================

    /// Rejects self-friendship and checks that both users exist.
    async fn require_pair(&self, user_id: i64, friend_id: i64) -> ServiceResult<()> {
        if user_id == friend_id {
            return Err(ValidationError::SelfFriendship(user_id).into());
        }
        self.users.get(user_id).await?;
        self.users.get(friend_id).await?;
        Ok(())
    }

    /// Sends a friend request from `user_id` to `friend_id`.
    pub async fn add_friend(&self, user_id: i64, friend_id: i64) -> ServiceResult<()> {
        self.require_pair(user_id, friend_id).await?;
        self.users.add_friend(user_id, friend_id).await
    }

    /// Confirms the friendship between two users on both directions.
    pub async fn confirm_friend(&self, user_id: i64, friend_id: i64) -> ServiceResult<()> {
        self.require_pair(user_id, friend_id).await?;
        self.users.confirm_friend(user_id, friend_id).await
    }

    /// Removes the friendship between two existing users.
    pub async fn remove_friend(&self, user_id: i64, friend_id: i64) -> ServiceResult<()> {
        self.users.get(user_id).await?;
        self.users.get(friend_id).await?;
        self.users.remove_friend(user_id, friend_id).await
    }

    /// Lists the friends of an existing user.
    pub async fn friends_of(&self, user_id: i64) -> ServiceResult<Vec<User>> {
        self.users.get(user_id).await?;
        self.users.friends_of(user_id).await
    }

    /// Lists friends shared by two existing users.
    pub async fn common_friends(&self, user_id: i64, other_id: i64) -> ServiceResult<Vec<User>> {
        self.users.get(user_id).await?;
        self.users.get(other_id).await?;
        self.users.common_friends(user_id, other_id).await
    }
}
