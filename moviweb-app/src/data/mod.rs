//! Data Manager: storage abstraction over user/movie/review state
//!
//! One capability trait with two interchangeable backends, selected at
//! startup: a JSON flat-file store and a SQLite store.

pub mod json_store;
pub mod sqlite_store;

pub use json_store::JsonDataManager;
pub use sqlite_store::SqliteDataManager;

use async_trait::async_trait;
use moviweb_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User entry as exposed by `get_all_users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
}

/// Movie fields as exposed by `get_username_and_movies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub title: String,
    pub director: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<f64>,
}

/// Normalized external metadata payload for a title lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedMovie {
    pub title: String,
    pub director: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<f64>,
}

/// Partial update of movie fields
///
/// Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieUpdate {
    pub director: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<f64>,
}

/// Review joined with its author's display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub movie_id: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
}

/// Storage capability behind the route handlers.
///
/// Identifiers are strings at this boundary so both backends fit one
/// contract: the SQLite store parses them as integers (unparseable ids are
/// treated as not-found), the JSON store uses opaque UUID tokens.
#[async_trait]
pub trait DataManager: Send + Sync {
    /// All users keyed by identifier.
    ///
    /// Fails soft: unreadable storage yields an empty map (logged).
    async fn get_all_users(&self) -> HashMap<String, UserSummary>;

    /// Create a user with a freshly generated identifier.
    ///
    /// Returns `false` when the name is already taken.
    async fn add_user(&self, name: &str) -> Result<bool>;

    /// Delete a user and their favorite links. Returns `false` for an
    /// unknown user. Movie and review records are left in place.
    async fn delete_user(&self, user_id: &str) -> Result<bool>;

    /// Display name plus favorite movies for one user; `None` for an
    /// unknown user, empty map for a user with no favorites.
    async fn get_username_and_movies(
        &self,
        user_id: &str,
    ) -> Result<Option<(String, HashMap<String, MovieDetails>)>>;

    /// Add a fetched movie to a user's favorites.
    ///
    /// The movie record is looked up by title and created on first sight;
    /// returns `false` when the title is already in that user's list.
    /// An unknown user is an error.
    async fn add_movie(&self, user_id: &str, movie: &FetchedMovie) -> Result<bool>;

    /// Apply a partial field update to a favorited movie record.
    /// Returns `false` when the user or movie is unknown.
    async fn update_user_movies(
        &self,
        user_id: &str,
        movie_id: &str,
        update: &MovieUpdate,
    ) -> Result<bool>;

    /// Remove only the favorite link; the movie record itself survives.
    /// Returns `false` when there is nothing to delete.
    async fn delete_user_movie(&self, user_id: &str, movie_id: &str) -> Result<bool>;

    /// Create a review. An unknown user or movie is an error.
    async fn add_review(&self, user_id: &str, movie_id: &str, text: &str) -> Result<bool>;

    /// All reviews for one movie, each joined with the reviewer's
    /// display name. Empty map when there are none.
    async fn get_all_reviews(&self, movie_id: &str) -> Result<HashMap<String, ReviewEntry>>;
}
