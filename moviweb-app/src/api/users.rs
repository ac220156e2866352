//! User management API handlers
//!
//! GET /users, POST /users, DELETE /users/:user_id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{data::UserSummary, error::ApiResult, ApiError, AppState};

/// POST /users request
#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub name: String,
}

/// Response for simple state-changing calls
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// GET /users
///
/// All registered users keyed by identifier.
pub async fn list_users(State(state): State<AppState>) -> Json<HashMap<String, UserSummary>> {
    Json(state.data.get_all_users().await)
}

/// POST /users
///
/// Register a new user; the identifier is generated by the backend.
pub async fn add_user(
    State(state): State<AppState>,
    Json(request): Json<AddUserRequest>,
) -> ApiResult<(StatusCode, Json<StatusResponse>)> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    tracing::info!(name = %name, "Add user");

    let created = state.data.add_user(name).await?;
    if !created {
        return Err(ApiError::BadRequest(format!(
            "username '{}' is already taken",
            name
        )));
    }

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            status: "created".to_string(),
        }),
    ))
}

/// DELETE /users/:user_id
///
/// Remove a user and their favorite links. Their movie and review records
/// stay behind.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    tracing::info!(user_id = %user_id, "Delete user");

    let deleted = state.data.delete_user(&user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("user {}", user_id)));
    }

    Ok(Json(StatusResponse {
        status: "deleted".to_string(),
    }))
}

/// Build user management routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(add_user))
        .route("/users/:user_id", delete(delete_user))
}
