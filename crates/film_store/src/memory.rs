//! In-memory film store implementation.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use entities::{Film, FriendshipStatus, Genre, MpaRating, User};
use tokio::sync::RwLock;

use crate::{FilmStore, FilmStoreError, FilmStoreResult, IdGenerator};

/// In-memory film store.
///
/// Each table sits behind its own lock. Friendship writes take the user
/// table's write lock once for both directions.
#[derive(Debug)]
pub struct MemoryFilmStore {
    film_ids: IdGenerator,
    user_ids: IdGenerator,
    films: RwLock<BTreeMap<i64, Film>>,
    users: RwLock<BTreeMap<i64, User>>,
    genres: BTreeMap<i64, Genre>,
    mpa_ratings: BTreeMap<i64, MpaRating>,
}

impl MemoryFilmStore {
    /// Creates an empty store seeded with the genre and rating tables.
    pub fn new() -> Self {
        Self {
            film_ids: IdGenerator::new(),
            user_ids: IdGenerator::new(),
            films: RwLock::default(),
            users: RwLock::default(),
            genres: Genre::all().into_iter().map(|g| (g.id, g)).collect(),
            mpa_ratings: MpaRating::all().into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

impl MemoryFilmStore {
    // Lock order: films before users.
    async fn require_user(&self, id: i64) -> FilmStoreResult<()> {
        if self.users.read().await.contains_key(&id) {
            Ok(())
        } else {
            Err(FilmStoreError::not_found("User", id))
        }
    }
}

impl Default for MemoryFilmStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `status` on both directions of the edge between two existing users.
fn set_friendship(
    users: &mut BTreeMap<i64, User>,
    user_id: i64,
    friend_id: i64,
    status: FriendshipStatus,
) -> FilmStoreResult<()> {
    for id in [user_id, friend_id] {
        if !users.contains_key(&id) {
            return Err(FilmStoreError::not_found("User", id));
        }
    }

    for (from, to) in [(user_id, friend_id), (friend_id, user_id)] {
        if let Some(user) = users.get_mut(&from) {
            user.friends.insert(to, status);
        }
    }
    Ok(())
}

#[async_trait]
impl FilmStore for MemoryFilmStore {
    // =========================================================================
    // Film operations
    // =========================================================================

    async fn create_film(&self, mut film: Film) -> FilmStoreResult<Film> {
        let mut films = self.films.write().await;
        film.id = self.film_ids.next_id();
        film.likes = BTreeSet::new();
        films.insert(film.id, film.clone());
        Ok(film)
    }

    async fn get_film(&self, id: i64) -> FilmStoreResult<Option<Film>> {
        let films = self.films.read().await;
        Ok(films.get(&id).cloned())
    }

    async fn list_films(&self) -> FilmStoreResult<Vec<Film>> {
        let films = self.films.read().await;
        Ok(films.values().cloned().collect())
    }

    async fn update_film(&self, mut film: Film) -> FilmStoreResult<Film> {
        let mut films = self.films.write().await;
        let stored = films
            .get_mut(&film.id)
            .ok_or_else(|| FilmStoreError::not_found("Film", film.id))?;
        film.likes = std::mem::take(&mut stored.likes);
        *stored = film.clone();
        Ok(film)
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> FilmStoreResult<()> {
        let mut films = self.films.write().await;
        let film = films
            .get_mut(&film_id)
            .ok_or_else(|| FilmStoreError::not_found("Film", film_id))?;
        self.require_user(user_id).await?;
        film.likes.insert(user_id);
        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> FilmStoreResult<()> {
        let mut films = self.films.write().await;
        let film = films
            .get_mut(&film_id)
            .ok_or_else(|| FilmStoreError::not_found("Film", film_id))?;
        self.require_user(user_id).await?;
        film.likes.remove(&user_id);
        Ok(())
    }

    async fn popular_films(&self, count: usize) -> FilmStoreResult<Vec<Film>> {
        let mut result: Vec<Film> = {
            let films = self.films.read().await;
            films.values().cloned().collect()
        };

        // Stable sort: equal counts stay in identifier order.
        result.sort_by(|a, b| b.like_count().cmp(&a.like_count()));
        result.truncate(count);
        Ok(result)
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, mut user: User) -> FilmStoreResult<User> {
        let mut users = self.users.write().await;
        user.id = self.user_ids.next_id();
        user.friends = BTreeMap::new();
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> FilmStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list_users(&self) -> FilmStoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn update_user(&self, mut user: User) -> FilmStoreResult<User> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&user.id)
            .ok_or_else(|| FilmStoreError::not_found("User", user.id))?;
        user.friends = std::mem::take(&mut stored.friends);
        *stored = user.clone();
        Ok(user)
    }

    // =========================================================================
    // Friendship operations
    // =========================================================================

    async fn add_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()> {
        let mut users = self.users.write().await;
        set_friendship(&mut users, user_id, friend_id, FriendshipStatus::Unconfirmed)
    }

    async fn confirm_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()> {
        let mut users = self.users.write().await;
        set_friendship(&mut users, user_id, friend_id, FriendshipStatus::Confirmed)
    }

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()> {
        let mut users = self.users.write().await;
        for id in [user_id, friend_id] {
            if !users.contains_key(&id) {
                return Err(FilmStoreError::not_found("User", id));
            }
        }

        for (from, to) in [(user_id, friend_id), (friend_id, user_id)] {
            if let Some(user) = users.get_mut(&from) {
                user.friends.remove(&to);
            }
        }
        Ok(())
    }

    async fn list_friends(&self, user_id: i64) -> FilmStoreResult<Vec<User>> {
        let users = self.users.read().await;
        let user = users
            .get(&user_id)
            .ok_or_else(|| FilmStoreError::not_found("User", user_id))?;

        Ok(user
            .friends
            .keys()
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }

    async fn list_common_friends(
        &self,
        user_id: i64,
        other_id: i64,
    ) -> FilmStoreResult<Vec<User>> {
        let users = self.users.read().await;
        let user = users
            .get(&user_id)
            .ok_or_else(|| FilmStoreError::not_found("User", user_id))?;
        let other = users
            .get(&other_id)
            .ok_or_else(|| FilmStoreError::not_found("User", other_id))?;

        let mine: BTreeSet<i64> = user.friends.keys().copied().collect();
        let theirs: BTreeSet<i64> = other.friends.keys().copied().collect();

        Ok(mine
            .intersection(&theirs)
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    async fn list_genres(&self) -> FilmStoreResult<Vec<Genre>> {
        Ok(self.genres.values().cloned().collect())
    }

    async fn get_genre(&self, id: i64) -> FilmStoreResult<Option<Genre>> {
        Ok(self.genres.get(&id).cloned())
    }

    async fn list_mpa_ratings(&self) -> FilmStoreResult<Vec<MpaRating>> {
        Ok(self.mpa_ratings.values().cloned().collect())
    }

    async fn get_mpa_rating(&self, id: i64) -> FilmStoreResult<Option<MpaRating>> {
        Ok(self.mpa_ratings.get(&id).cloned())
    }
}
