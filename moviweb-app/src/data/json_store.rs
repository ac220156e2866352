//! JSON flat-file data manager
//!
//! The whole user catalog lives in one document; every mutation re-reads
//! the file, applies the change in memory, and rewrites the file. The
//! read-modify-write cycle is serialized behind a mutex so concurrent
//! writers cannot lose updates. Identifiers are opaque UUID tokens.
//!
//! Reviews live in a sibling document so the user-catalog shape stays
//! stable: `{ review_id: {"user_id", "movie_id", "text"} }`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use moviweb_common::{Error, Result};

use super::{DataManager, FetchedMovie, MovieDetails, MovieUpdate, ReviewEntry, UserSummary};

/// Per-user movie entry as persisted on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredMovie {
    title: String,
    director: Option<String>,
    year: Option<i64>,
    rating: Option<f64>,
}

/// User record as persisted on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    name: String,
    #[serde(default)]
    movies: HashMap<String, StoredMovie>,
}

/// Review record as persisted in the sibling reviews document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredReview {
    user_id: String,
    movie_id: String,
    text: String,
}

type Catalog = HashMap<String, StoredUser>;
type Reviews = HashMap<String, StoredReview>;

/// Data manager over flat JSON documents
pub struct JsonDataManager {
    data_path: PathBuf,
    reviews_path: PathBuf,
    /// Guards the read-modify-write cycle on both documents
    lock: Mutex<()>,
}

impl JsonDataManager {
    pub fn new(data_path: PathBuf, reviews_path: PathBuf) -> Self {
        Self {
            data_path,
            reviews_path,
            lock: Mutex::new(()),
        }
    }

    fn load_catalog(&self) -> Result<Catalog> {
        load_document(&self.data_path)
    }

    fn write_catalog(&self, catalog: &Catalog) -> Result<()> {
        write_document(&self.data_path, catalog)
    }

    fn load_reviews(&self) -> Result<Reviews> {
        load_document(&self.reviews_path)
    }

    fn write_reviews(&self, reviews: &Reviews) -> Result<()> {
        write_document(&self.reviews_path, reviews)
    }
}

/// A missing file is an empty document; anything else unreadable is an error
fn load_document<T: Default + for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(document)?;
    std::fs::write(path, content)?;
    Ok(())
}

impl StoredMovie {
    fn details(&self) -> MovieDetails {
        MovieDetails {
            title: self.title.clone(),
            director: self.director.clone(),
            year: self.year,
            rating: self.rating,
        }
    }
}

#[async_trait]
impl DataManager for JsonDataManager {
    async fn get_all_users(&self) -> HashMap<String, UserSummary> {
        let _guard = self.lock.lock().await;

        match self.load_catalog() {
            Ok(catalog) => catalog
                .into_iter()
                .map(|(user_id, user)| (user_id, UserSummary { name: user.name }))
                .collect(),
            Err(e) => {
                warn!("Error reading {}: {}", self.data_path.display(), e);
                HashMap::new()
            }
        }
    }

    async fn add_user(&self, name: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let mut catalog = self.load_catalog()?;
        if catalog.values().any(|user| user.name == name) {
            return Ok(false);
        }

        catalog.insert(
            Uuid::new_v4().to_string(),
            StoredUser {
                name: name.to_string(),
                movies: HashMap::new(),
            },
        );
        self.write_catalog(&catalog)?;

        Ok(true)
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let mut catalog = self.load_catalog()?;
        if catalog.remove(user_id).is_none() {
            return Ok(false);
        }
        self.write_catalog(&catalog)?;

        Ok(true)
    }

    async fn get_username_and_movies(
        &self,
        user_id: &str,
    ) -> Result<Option<(String, HashMap<String, MovieDetails>)>> {
        let _guard = self.lock.lock().await;

        let catalog = self.load_catalog()?;
        let Some(user) = catalog.get(user_id) else {
            return Ok(None);
        };

        let movies = user
            .movies
            .iter()
            .map(|(movie_id, movie)| (movie_id.clone(), movie.details()))
            .collect();

        Ok(Some((user.name.clone(), movies)))
    }

    async fn add_movie(&self, user_id: &str, movie: &FetchedMovie) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let mut catalog = self.load_catalog()?;
        let Some(user) = catalog.get_mut(user_id) else {
            return Err(Error::NotFound(format!("user {}", user_id)));
        };

        // Duplicate detection is by title: per-user scan, since this model
        // has no shared movie table
        if user.movies.values().any(|m| m.title == movie.title) {
            return Ok(false);
        }

        user.movies.insert(
            Uuid::new_v4().to_string(),
            StoredMovie {
                title: movie.title.clone(),
                director: movie.director.clone(),
                year: movie.year,
                rating: movie.rating,
            },
        );
        self.write_catalog(&catalog)?;

        Ok(true)
    }

    async fn update_user_movies(
        &self,
        user_id: &str,
        movie_id: &str,
        update: &MovieUpdate,
    ) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let mut catalog = self.load_catalog()?;
        let Some(user) = catalog.get_mut(user_id) else {
            return Ok(false);
        };
        let Some(movie) = user.movies.get_mut(movie_id) else {
            return Ok(false);
        };

        if let Some(director) = &update.director {
            movie.director = Some(director.clone());
        }
        if let Some(year) = update.year {
            movie.year = Some(year);
        }
        if let Some(rating) = update.rating {
            movie.rating = Some(rating);
        }
        self.write_catalog(&catalog)?;

        Ok(true)
    }

    async fn delete_user_movie(&self, user_id: &str, movie_id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let mut catalog = self.load_catalog()?;
        let Some(user) = catalog.get_mut(user_id) else {
            return Ok(false);
        };
        if user.movies.remove(movie_id).is_none() {
            return Ok(false);
        }
        self.write_catalog(&catalog)?;

        Ok(true)
    }

    async fn add_review(&self, user_id: &str, movie_id: &str, text: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let catalog = self.load_catalog()?;
        if !catalog.contains_key(user_id) {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        let movie_known = catalog
            .values()
            .any(|user| user.movies.contains_key(movie_id));
        if !movie_known {
            return Err(Error::NotFound(format!("movie {}", movie_id)));
        }

        let mut reviews = self.load_reviews()?;
        reviews.insert(
            Uuid::new_v4().to_string(),
            StoredReview {
                user_id: user_id.to_string(),
                movie_id: movie_id.to_string(),
                text: text.to_string(),
            },
        );
        self.write_reviews(&reviews)?;

        Ok(true)
    }

    async fn get_all_reviews(&self, movie_id: &str) -> Result<HashMap<String, ReviewEntry>> {
        let _guard = self.lock.lock().await;

        let catalog = self.load_catalog()?;
        let reviews = self.load_reviews()?;

        // Reviews whose author is gone are dropped, matching the relational
        // backend's inner join
        let entries = reviews
            .into_iter()
            .filter(|(_, review)| review.movie_id == movie_id)
            .filter_map(|(review_id, review)| {
                let user_name = catalog.get(&review.user_id)?.name.clone();
                Some((
                    review_id,
                    ReviewEntry {
                        movie_id: review.movie_id,
                        user_id: review.user_id,
                        user_name,
                        text: review.text,
                    },
                ))
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(dir: &tempfile::TempDir) -> JsonDataManager {
        JsonDataManager::new(
            dir.path().join("movie_data.json"),
            dir.path().join("reviews.json"),
        )
    }

    fn inception() -> FetchedMovie {
        FetchedMovie {
            title: "Inception".to_string(),
            director: Some("C. Nolan".to_string()),
            year: Some(2010),
            rating: Some(8.8),
        }
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        assert!(store.get_all_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_soft_on_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("movie_data.json"), "{not json").unwrap();
        let store = test_store(&dir);

        assert!(store.get_all_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_persisted_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        store.add_user("alice").await.unwrap();
        let user_id = store.get_all_users().await.keys().next().cloned().unwrap();
        store.add_movie(&user_id, &inception()).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("movie_data.json")).unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();

        let user = &document[&user_id];
        assert_eq!(user["name"], "alice");
        let (_, movie) = user["movies"]
            .as_object()
            .unwrap()
            .iter()
            .next()
            .unwrap();
        assert_eq!(movie["title"], "Inception");
        assert_eq!(movie["year"], 2010);
        assert_eq!(movie["rating"], 8.8);
    }

    #[tokio::test]
    async fn test_duplicate_title_in_favorites_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        store.add_user("alice").await.unwrap();
        let user_id = store.get_all_users().await.keys().next().cloned().unwrap();

        assert!(store.add_movie(&user_id, &inception()).await.unwrap());
        assert!(!store.add_movie(&user_id, &inception()).await.unwrap());
    }

    #[tokio::test]
    async fn test_review_survives_only_with_author() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        store.add_user("alice").await.unwrap();
        let user_id = store.get_all_users().await.keys().next().cloned().unwrap();
        store.add_movie(&user_id, &inception()).await.unwrap();
        let (_, movies) = store
            .get_username_and_movies(&user_id)
            .await
            .unwrap()
            .unwrap();
        let movie_id = movies.keys().next().cloned().unwrap();

        store.add_review(&user_id, &movie_id, "mind-bending").await.unwrap();

        let reviews = store.get_all_reviews(&movie_id).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews.values().next().unwrap().user_name, "alice");

        // Deleting the author hides the review, like the SQL inner join
        store.delete_user(&user_id).await.unwrap();
        assert!(store.get_all_reviews(&movie_id).await.unwrap().is_empty());
    }
}
