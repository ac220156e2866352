//! SQLite-backed data manager
//!
//! Auto-increment integer identifiers, one shared movie catalog keyed by
//! unique title, favorite links in a join table. Each mutating call runs in
//! its own transaction: commit on success, rollback on error or drop.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::warn;

use moviweb_common::{Error, Result};

use super::{DataManager, FetchedMovie, MovieDetails, MovieUpdate, ReviewEntry, UserSummary};

/// Data manager over the relational schema
#[derive(Clone)]
pub struct SqliteDataManager {
    pool: SqlitePool,
}

impl SqliteDataManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Trait-level ids are strings; anything non-numeric cannot name a row
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl DataManager for SqliteDataManager {
    async fn get_all_users(&self) -> HashMap<String, UserSummary> {
        let rows = sqlx::query("SELECT user_id, user FROM user")
            .fetch_all(&self.pool)
            .await;

        match rows {
            Ok(rows) => rows
                .into_iter()
                .map(|row| {
                    let user_id: i64 = row.get("user_id");
                    let name: String = row.get("user");
                    (user_id.to_string(), UserSummary { name })
                })
                .collect(),
            Err(e) => {
                warn!("Error retrieving users: {}", e);
                HashMap::new()
            }
        }
    }

    async fn add_user(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("INSERT INTO user (user) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let Some(user_id) = parse_id(user_id) else {
            return Ok(false);
        };

        let mut tx = self.pool.begin().await?;

        // Favorite links go first to avoid orphaned foreign keys.
        // Movie and review rows are intentionally left in place.
        sqlx::query("DELETE FROM user_movies WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM user WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_username_and_movies(
        &self,
        user_id: &str,
    ) -> Result<Option<(String, HashMap<String, MovieDetails>)>> {
        let Some(user_id) = parse_id(user_id) else {
            return Ok(None);
        };

        let name: Option<String> = sqlx::query_scalar("SELECT user FROM user WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(name) = name else {
            return Ok(None);
        };

        let rows = sqlx::query(
            r#"
            SELECT m.movie_id, m.title, m.director, m.publication_year, m.rating
            FROM movie m
            JOIN user_movies um ON um.movie_id = m.movie_id
            WHERE um.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let movies = rows
            .into_iter()
            .map(|row| {
                let movie_id: i64 = row.get("movie_id");
                let details = MovieDetails {
                    title: row.get("title"),
                    director: row.get("director"),
                    year: row.get("publication_year"),
                    rating: row.get("rating"),
                };
                (movie_id.to_string(), details)
            })
            .collect();

        Ok(Some((name, movies)))
    }

    async fn add_movie(&self, user_id: &str, movie: &FetchedMovie) -> Result<bool> {
        let Some(user_id) = parse_id(user_id) else {
            return Err(Error::NotFound(format!("user {}", user_id)));
        };

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT user_id FROM user WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }

        // One shared movie record per title across all users
        let known: Option<i64> = sqlx::query_scalar("SELECT movie_id FROM movie WHERE title = ?")
            .bind(&movie.title)
            .fetch_optional(&mut *tx)
            .await?;

        let movie_id = match known {
            Some(movie_id) => {
                let linked: Option<i64> = sqlx::query_scalar(
                    "SELECT entry_id FROM user_movies WHERE user_id = ? AND movie_id = ?",
                )
                .bind(user_id)
                .bind(movie_id)
                .fetch_optional(&mut *tx)
                .await?;

                if linked.is_some() {
                    // Already in this user's favorites
                    return Ok(false);
                }
                movie_id
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO movie (title, director, publication_year, rating)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(&movie.title)
                .bind(&movie.director)
                .bind(movie.year)
                .bind(movie.rating)
                .execute(&mut *tx)
                .await?;

                result.last_insert_rowid()
            }
        };

        sqlx::query("INSERT INTO user_movies (user_id, movie_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn update_user_movies(
        &self,
        user_id: &str,
        movie_id: &str,
        update: &MovieUpdate,
    ) -> Result<bool> {
        let (Some(user_id), Some(movie_id)) = (parse_id(user_id), parse_id(movie_id)) else {
            return Ok(false);
        };

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT user_id FROM user WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }

        // Partial update: absent fields keep their stored values
        let result = sqlx::query(
            r#"
            UPDATE movie SET
                director = COALESCE(?, director),
                publication_year = COALESCE(?, publication_year),
                rating = COALESCE(?, rating)
            WHERE movie_id = ?
            "#,
        )
        .bind(&update.director)
        .bind(update.year)
        .bind(update.rating)
        .bind(movie_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user_movie(&self, user_id: &str, movie_id: &str) -> Result<bool> {
        let (Some(user_id), Some(movie_id)) = (parse_id(user_id), parse_id(movie_id)) else {
            return Ok(false);
        };

        // Only the favorite link; the shared movie record survives
        let result = sqlx::query("DELETE FROM user_movies WHERE user_id = ? AND movie_id = ?")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_review(&self, user_id: &str, movie_id: &str, text: &str) -> Result<bool> {
        let (Some(user_id), Some(movie_id)) = (parse_id(user_id), parse_id(movie_id)) else {
            return Err(Error::NotFound("user or movie".to_string()));
        };

        let result = sqlx::query(
            "INSERT INTO review (user_id, movie_id, review_text) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(text)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => Err(
                Error::NotFound(format!("user {} or movie {}", user_id, movie_id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_all_reviews(&self, movie_id: &str) -> Result<HashMap<String, ReviewEntry>> {
        let Some(movie_id) = parse_id(movie_id) else {
            return Ok(HashMap::new());
        };

        let rows = sqlx::query(
            r#"
            SELECT r.review_id, r.user_id, r.movie_id, r.review_text, u.user
            FROM review r
            JOIN user u ON u.user_id = r.user_id
            WHERE r.movie_id = ?
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        let reviews = rows
            .into_iter()
            .map(|row| {
                let review_id: i64 = row.get("review_id");
                let user_id: i64 = row.get("user_id");
                let movie_id: i64 = row.get("movie_id");
                let entry = ReviewEntry {
                    movie_id: movie_id.to_string(),
                    user_id: user_id.to_string(),
                    user_name: row.get("user"),
                    text: row.get("review_text"),
                };
                (review_id.to_string(), entry)
            })
            .collect();

        Ok(reviews)
    }
}
