//! Review API handlers
//!
//! POST /users/:user_id/movies/:movie_id/reviews, GET /movies/:movie_id/reviews

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{data::ReviewEntry, error::ApiResult, ApiError, AppState};

/// POST review request
#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    pub text: String,
}

/// Response for simple state-changing calls
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// POST /users/:user_id/movies/:movie_id/reviews
///
/// Leave a review on a movie.
pub async fn add_review(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(String, String)>,
    Json(request): Json<AddReviewRequest>,
) -> ApiResult<(StatusCode, Json<StatusResponse>)> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest(
            "review text must not be empty".to_string(),
        ));
    }

    tracing::info!(user_id = %user_id, movie_id = %movie_id, "Add review");

    state.data.add_review(&user_id, &movie_id, text).await?;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            status: "created".to_string(),
        }),
    ))
}

/// GET /movies/:movie_id/reviews
///
/// All reviews for one movie, each with the reviewer's display name.
pub async fn get_movie_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> ApiResult<Json<HashMap<String, ReviewEntry>>> {
    let reviews = state.data.get_all_reviews(&movie_id).await?;
    Ok(Json(reviews))
}

/// Build review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/movies/:movie_id/reviews", post(add_review))
        .route("/movies/:movie_id/reviews", get(get_movie_reviews))
}
