//! API endpoints.

pub mod films;
pub mod reference;
pub mod users;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use film_store::FilmStore;
use serde_json::{Value, json};

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: FilmStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Film endpoints
        .route(
            "/films",
            get(films::list_films)
                .post(films::create_film)
                .put(films::update_film),
        )
        .route("/films/popular", get(films::popular_films))
        .route("/films/:id", get(films::get_film))
        .route(
            "/films/:id/like/:user_id",
            put(films::like_film).delete(films::unlike_film),
        )
        // User endpoints
        .route(
            "/users",
            get(users::list_users)
                .post(users::create_user)
                .put(users::update_user),
        )
        .route("/users/:id", get(users::get_user))
        .route("/users/:id/friends", get(users::list_friends))
        .route(
            "/users/:id/friends/:friend_id",
            put(users::add_friend).delete(users::remove_friend),
        )
        .route(
            "/users/:id/friends/:friend_id/confirm",
            put(users::confirm_friend),
        )
        .route(
            "/users/:id/friends/common/:other_id",
            get(users::common_friends),
        )
        // Reference data endpoints
        .route("/genres", get(reference::list_genres))
        .route("/genres/:id", get(reference::get_genre))
        .route("/mpa", get(reference::list_mpa_ratings))
        .route("/mpa/:id", get(reference::get_mpa_rating))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint. Reports the configured storage backend.
async fn health_check<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "storage": state.config.storage.as_str(),
    }))
}
