//! User directory: profiles and friendship edges.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use entities::{User, ValidationError};
use film_store::FilmStore;

use crate::{ServiceError, ServiceResult};

/// Owns user records and their friendship maps.
#[derive(Debug)]
pub struct UserDirectory<S> {
    store: Arc<S>,
}

impl<S> Clone for UserDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn ensure_distinct(user_id: i64, friend_id: i64) -> ServiceResult<()> {
    if user_id == friend_id {
        return Err(ValidationError::SelfFriendship(user_id).into());
    }
    Ok(())
}

impl<S: FilmStore> UserDirectory<S> {
    /// Creates a directory over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validates and stores a new user. A blank name becomes the login.
    pub async fn add(&self, mut user: User) -> ServiceResult<User> {
        user.apply_default_name();
        user.validate(today())?;
        let user = self.store.create_user(user).await?;

        tracing::info!(user_id = user.id, login = %user.login, "User added");
        Ok(user)
    }

    /// Validates and replaces an existing user. The friendship map is kept.
    pub async fn update(&self, mut user: User) -> ServiceResult<User> {
        self.get(user.id).await?;
        user.apply_default_name();
        user.validate(today())?;
        let user = self.store.update_user(user).await?;

        tracing::info!(user_id = user.id, "User updated");
        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get(&self, id: i64) -> ServiceResult<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Lists all users, ordered by identifier.
    pub async fn list_all(&self) -> ServiceResult<Vec<User>> {
        Ok(self.store.list_users().await?)
    }

    /// Sends a friend request: both directions become unconfirmed.
    pub async fn add_friend(&self, user_id: i64, friend_id: i64) -> ServiceResult<()> {
        ensure_distinct(user_id, friend_id)?;
        self.store.add_friend(user_id, friend_id).await?;

        tracing::info!(user_id, friend_id, "Friend request added");
        Ok(())
    }

    /// Confirms a friendship on both directions.
    ///
    /// A pair with no prior request is created directly as confirmed.
    pub async fn confirm_friend(&self, user_id: i64, friend_id: i64) -> ServiceResult<()> {
        ensure_distinct(user_id, friend_id)?;
        self.store.confirm_friend(user_id, friend_id).await?;

        tracing::info!(user_id, friend_id, "Friendship confirmed");
        Ok(())
    }

    /// Removes both directions of a friendship. A missing edge is a no-op.
    pub async fn remove_friend(&self, user_id: i64, friend_id: i64) -> ServiceResult<()> {
        self.store.remove_friend(user_id, friend_id).await?;

        tracing::info!(user_id, friend_id, "Friendship removed");
        Ok(())
    }

    /// Lists the friends of a user, ordered by identifier.
    pub async fn friends_of(&self, user_id: i64) -> ServiceResult<Vec<User>> {
        Ok(self.store.list_friends(user_id).await?)
    }

    /// Lists friends shared by two users, ordered by identifier.
    pub async fn common_friends(&self, user_id: i64, other_id: i64) -> ServiceResult<Vec<User>> {
        Ok(self.store.list_common_friends(user_id, other_id).await?)
    }
}
