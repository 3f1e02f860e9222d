//! Genre and MPA rating endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use entities::{Genre, MpaRating};
use film_store::FilmStore;

use crate::error::ServerResult;
use crate::state::AppState;

pub async fn list_genres<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<Genre>>> {
    Ok(Json(state.facade.reference().genres().await?))
}

pub async fn get_genre<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServerResult<Json<Genre>> {
    let Path(id) = path?;
    Ok(Json(state.facade.reference().genre(id).await?))
}

pub async fn list_mpa_ratings<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<MpaRating>>> {
    Ok(Json(state.facade.reference().mpa_ratings().await?))
}

pub async fn get_mpa_rating<S: FilmStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServerResult<Json<MpaRating>> {
    let Path(id) = path?;
    Ok(Json(state.facade.reference().mpa_rating(id).await?))
}
