//! Favorite movie API handlers
//!
//! GET/POST /users/:user_id/movies, PUT/DELETE /users/:user_id/movies/:movie_id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    data::{FetchedMovie, MovieDetails, MovieUpdate},
    error::ApiResult,
    ApiError, AppState,
};

/// POST /users/:user_id/movies request
#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    /// Title to look up in the external metadata catalog
    pub title: String,
}

/// GET /users/:user_id/movies response
#[derive(Debug, Serialize)]
pub struct UserMoviesResponse {
    pub user_id: String,
    pub name: String,
    pub movies: HashMap<String, MovieDetails>,
}

/// POST /users/:user_id/movies response
#[derive(Debug, Serialize)]
pub struct AddMovieResponse {
    pub status: String,
    pub movie: FetchedMovie,
}

/// PUT /users/:user_id/movies/:movie_id request (partial update)
#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub director: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<f64>,
}

/// Response for simple state-changing calls
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// GET /users/:user_id/movies
///
/// A user's display name plus their favorite movies.
pub async fn get_user_movies(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserMoviesResponse>> {
    let Some((name, movies)) = state.data.get_username_and_movies(&user_id).await? else {
        return Err(ApiError::NotFound(format!("user {}", user_id)));
    };

    Ok(Json(UserMoviesResponse {
        user_id,
        name,
        movies,
    }))
}

/// POST /users/:user_id/movies
///
/// Look the title up in the external catalog, then add it to the user's
/// favorites. Adding a title twice is a 400.
pub async fn add_user_movie(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<AddMovieRequest>,
) -> ApiResult<(StatusCode, Json<AddMovieResponse>)> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    if state.data.get_username_and_movies(&user_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("user {}", user_id)));
    }

    let Some(metadata) = &state.metadata else {
        return Err(ApiError::Internal(
            "OMDb API key not configured".to_string(),
        ));
    };

    let movie = metadata.fetch_by_title(title).await?;

    tracing::info!(user_id = %user_id, title = %movie.title, "Add movie to favorites");

    let added = state.data.add_movie(&user_id, &movie).await?;
    if !added {
        return Err(ApiError::BadRequest(format!(
            "'{}' is already in the user's favorite list",
            movie.title
        )));
    }

    Ok((
        StatusCode::CREATED,
        Json(AddMovieResponse {
            status: "created".to_string(),
            movie,
        }),
    ))
}

/// PUT /users/:user_id/movies/:movie_id
///
/// Partial update of director / year / rating on the movie record.
pub async fn update_user_movie(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(String, String)>,
    Json(request): Json<UpdateMovieRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let update = MovieUpdate {
        director: request.director,
        year: request.year,
        rating: request.rating,
    };

    tracing::info!(user_id = %user_id, movie_id = %movie_id, "Update movie details");

    let updated = state
        .data
        .update_user_movies(&user_id, &movie_id, &update)
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!(
            "user {} or movie {}",
            user_id, movie_id
        )));
    }

    Ok(Json(StatusResponse {
        status: "updated".to_string(),
    }))
}

/// DELETE /users/:user_id/movies/:movie_id
///
/// Remove the favorite link only; the movie record stays shared.
pub async fn delete_user_movie(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(String, String)>,
) -> ApiResult<Json<StatusResponse>> {
    tracing::info!(user_id = %user_id, movie_id = %movie_id, "Remove movie from favorites");

    let deleted = state.data.delete_user_movie(&user_id, &movie_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!(
            "movie {} in user {}'s favorites",
            movie_id, user_id
        )));
    }

    Ok(Json(StatusResponse {
        status: "deleted".to_string(),
    }))
}

/// Build favorite movie routes
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/movies", get(get_user_movies))
        .route("/users/:user_id/movies", post(add_user_movie))
        .route("/users/:user_id/movies/:movie_id", put(update_user_movie))
        .route("/users/:user_id/movies/:movie_id", delete(delete_user_movie))
}
