//! Film API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use entities::Film;
use film_store::FilmStore;
use serde::Deserialize;

use crate::error::ServerResult;
use crate::state::AppState;

/// Query string for the popular films endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PopularQuery {
    pub count: Option<i64>,
}

/// Creates a film.
pub async fn create_film<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Result<Json<Film>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Film>)> {
    let Json(film) = request?;
    let film = state.facade.films().add(film).await?;
    Ok((StatusCode::CREATED, Json(film)))
}

/// Replaces a film. The body must carry the film's `id`.
pub async fn update_film<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Result<Json<Film>, JsonRejection>,
) -> ServerResult<Json<Film>> {
    let Json(film) = request?;
    let film = state.facade.films().update(film).await?;
    Ok(Json(film))
}

/// Lists all films.
pub async fn list_films<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<Film>>> {
    let films = state.facade.films().list_all().await?;
    tracing::debug!(count = films.len(), "Listed films");
    Ok(Json(films))
}

/// Gets a film by ID.
pub async fn get_film<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServerResult<Json<Film>> {
    let Path(id) = path?;
    let film = state.facade.films().get(id).await?;
    Ok(Json(film))
}

/// Lists the most liked films.
pub async fn popular_films<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<PopularQuery>, QueryRejection>,
) -> ServerResult<Json<Vec<Film>>> {
    let Query(query) = query?;
    let films = state.facade.popular_films(query.count).await?;
    Ok(Json(films))
}

/// Records a like.
pub async fn like_film<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ServerResult<StatusCode> {
    let Path((film_id, user_id)) = path?;
    state.facade.like(film_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Removes a like.
pub async fn unlike_film<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ServerResult<StatusCode> {
    let Path((film_id, user_id)) = path?;
    state.facade.unlike(film_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
