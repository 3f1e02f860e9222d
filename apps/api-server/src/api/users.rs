//! User and friendship API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use entities::User;
use film_store::FilmStore;

use crate::error::ServerResult;
use crate::state::AppState;

/// Creates a user.
pub async fn create_user<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Result<Json<User>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let Json(user) = request?;
    let user = state.facade.users().add(user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Replaces a user's profile. The body must carry the user's `id`.
pub async fn update_user<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Result<Json<User>, JsonRejection>,
) -> ServerResult<Json<User>> {
    let Json(user) = request?;
    let user = state.facade.users().update(user).await?;
    Ok(Json(user))
}

/// Lists all users.
pub async fn list_users<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<User>>> {
    let users = state.facade.users().list_all().await?;
    tracing::debug!(count = users.len(), "Listed users");
    Ok(Json(users))
}

/// Gets a user by ID.
pub async fn get_user<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServerResult<Json<User>> {
    let Path(id) = path?;
    let user = state.facade.users().get(id).await?;
    Ok(Json(user))
}

/// Sends a friend request.
pub async fn add_friend<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ServerResult<StatusCode> {
    let Path((user_id, friend_id)) = path?;
    state.facade.add_friend(user_id, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Confirms a friendship.
pub async fn confirm_friend<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ServerResult<StatusCode> {
    let Path((user_id, friend_id)) = path?;
    state.facade.confirm_friend(user_id, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Removes a friendship.
pub async fn remove_friend<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ServerResult<StatusCode> {
    let Path((user_id, friend_id)) = path?;
    state.facade.remove_friend(user_id, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists a user's friends.
pub async fn list_friends<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServerResult<Json<Vec<User>>> {
    let Path(user_id) = path?;
    let friends = state.facade.friends_of(user_id).await?;
    Ok(Json(friends))
}

/// Lists friends shared by two users.
pub async fn common_friends<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ServerResult<Json<Vec<User>>> {
    let Path((user_id, other_id)) = path?;
    let friends = state.facade.common_friends(user_id, other_id).await?;
    Ok(Json(friends))
}
