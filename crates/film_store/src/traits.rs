//! Film store trait definitions.

use async_trait::async_trait;
use entities::{Film, Genre, MpaRating, User};

use crate::FilmStoreResult;

/// Trait for film, user and friendship storage.
///
/// Every implementation provides the full operation set, including likes,
/// popularity and friendship edges, so callers never need to know which
/// backend they hold. Mutations are atomic with respect to concurrent
/// callers: both directions of a friendship are written together, and
/// like-set updates are never lost.
#[async_trait]
pub trait FilmStore: Send + Sync {
    // =========================================================================
    // Film operations
    // =========================================================================

    /// Stores a new film under a fresh identifier, with an empty like set.
    async fn create_film(&self, film: Film) -> FilmStoreResult<Film>;

    /// Gets a film by ID.
    async fn get_film(&self, id: i64) -> FilmStoreResult<Option<Film>>;

    /// Lists all films, ordered by identifier.
    async fn list_films(&self) -> FilmStoreResult<Vec<Film>>;

    /// Replaces a film's descriptive fields, keeping its like set.
    async fn update_film(&self, film: Film) -> FilmStoreResult<Film>;

    /// Records that a user likes a film. Repeated likes collapse into one.
    /// Fails with `NotFound` if either the film or the user is missing.
    async fn add_like(&self, film_id: i64, user_id: i64) -> FilmStoreResult<()>;

    /// Removes a like. Removing an absent like is a no-op, but the film and
    /// the user must both exist.
    async fn remove_like(&self, film_id: i64, user_id: i64) -> FilmStoreResult<()>;

    /// Returns up to `count` films by like count, most liked first.
    /// Films with equal counts keep identifier order.
    async fn popular_films(&self, count: usize) -> FilmStoreResult<Vec<Film>>;

    // =========================================================================
    // User operations
    // =========================================================================

    /// Stores a new user under a fresh identifier, with no friends.
    async fn create_user(&self, user: User) -> FilmStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: i64) -> FilmStoreResult<Option<User>>;

    /// Lists all users, ordered by identifier.
    async fn list_users(&self) -> FilmStoreResult<Vec<User>>;

    /// Replaces a user's profile fields, keeping the friendship map.
    async fn update_user(&self, user: User) -> FilmStoreResult<User>;

    // =========================================================================
    // Friendship operations
    // =========================================================================

    /// Sets both directions of a friendship to unconfirmed.
    async fn add_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()>;

    /// Sets both directions of a friendship to confirmed, creating the edge
    /// if it does not exist.
    async fn confirm_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()>;

    /// Deletes both directions of a friendship. A missing edge is a no-op.
    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()>;

    /// Lists a user's friends, ordered by identifier.
    async fn list_friends(&self, user_id: i64) -> FilmStoreResult<Vec<User>>;

    /// Lists the users both `user_id` and `other_id` are friends with,
    /// ordered by identifier.
    async fn list_common_friends(&self, user_id: i64, other_id: i64)
        -> FilmStoreResult<Vec<User>>;

    // =========================================================================
    // Reference data
    // =========================================================================

    /// Lists all genres, ordered by identifier.
    async fn list_genres(&self) -> FilmStoreResult<Vec<Genre>>;

    /// Gets a genre by ID.
    async fn get_genre(&self, id: i64) -> FilmStoreResult<Option<Genre>>;

    /// Lists all MPA ratings, ordered by identifier.
    async fn list_mpa_ratings(&self) -> FilmStoreResult<Vec<MpaRating>>;

    /// Gets an MPA rating by ID.
    async fn get_mpa_rating(&self, id: i64) -> FilmStoreResult<Option<MpaRating>>;
}
