//! OMDb API client
//!
//! Title lookups against the OMDb movie metadata service. The API signals
//! success with a `"Response": "True"` field rather than HTTP status codes,
//! and returns every payload field as a string.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::data::FetchedMovie;

const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";
const USER_AGENT: &str = "MoviWeb/0.1.0";

/// OMDb client errors
#[derive(Debug, Error)]
pub enum OmdbError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Title not found: {0}")]
    TitleNotFound(String),

    #[error("OMDb API key rejected")]
    InvalidApiKey,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Raw OMDb title-lookup payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbPayload {
    /// "True" on success, "False" with an `Error` message otherwise
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    /// Release year; ranges like "2010–2012" occur for series
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

/// OMDb API client
pub struct OmdbClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, OmdbError> {
        Self::with_base_url(OMDB_BASE_URL, api_key)
    }

    /// Client against a non-default endpoint (used by tests)
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, OmdbError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| OmdbError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Look up a movie by title
    pub async fn fetch_by_title(&self, title: &str) -> Result<FetchedMovie, OmdbError> {
        tracing::debug!(title = %title, "Querying OMDb API");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await
            .map_err(|e| OmdbError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(OmdbError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OmdbError::ApiError(status.as_u16(), error_text));
        }

        let payload: OmdbPayload = response
            .json()
            .await
            .map_err(|e| OmdbError::ParseError(e.to_string()))?;

        if !payload.response.eq_ignore_ascii_case("true") {
            let message = payload
                .error
                .unwrap_or_else(|| format!("no result for '{}'", title));
            return Err(OmdbError::TitleNotFound(message));
        }

        let movie = normalize_payload(payload)?;

        tracing::info!(
            title = %movie.title,
            year = ?movie.year,
            "Retrieved movie from OMDb"
        );

        Ok(movie)
    }
}

/// Convert the all-strings payload into typed fields
fn normalize_payload(payload: OmdbPayload) -> Result<FetchedMovie, OmdbError> {
    let title = payload
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| OmdbError::ParseError("payload missing Title".to_string()))?;

    Ok(FetchedMovie {
        title,
        director: payload.director.filter(|d| !d.is_empty() && d != "N/A"),
        year: payload.year.as_deref().and_then(parse_year),
        rating: payload.imdb_rating.as_deref().and_then(parse_rating),
    })
}

/// Leading four digits of the Year field ("2010", "2010–2012" → 2010)
fn parse_year(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

/// imdbRating is a decimal string, or "N/A" when unrated
fn parse_rating(raw: &str) -> Option<f64> {
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(year: &str, rating: &str, director: &str) -> OmdbPayload {
        OmdbPayload {
            response: "True".to_string(),
            title: Some("Inception".to_string()),
            director: Some(director.to_string()),
            year: Some(year.to_string()),
            imdb_rating: Some(rating.to_string()),
            error: None,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = OmdbClient::new("test-key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_year_parsing() {
        assert_eq!(parse_year("2010"), Some(2010));
        assert_eq!(parse_year("2010–2012"), Some(2010));
        assert_eq!(parse_year("N/A"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("99"), None);
    }

    #[test]
    fn test_rating_parsing() {
        assert_eq!(parse_rating("8.8"), Some(8.8));
        assert_eq!(parse_rating("N/A"), None);
    }

    #[test]
    fn test_normalize_typed_fields() {
        let movie = normalize_payload(payload("2010", "8.8", "Christopher Nolan")).unwrap();

        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(movie.year, Some(2010));
        assert_eq!(movie.rating, Some(8.8));
    }

    #[test]
    fn test_normalize_na_fields_are_absent() {
        let movie = normalize_payload(payload("N/A", "N/A", "N/A")).unwrap();

        assert_eq!(movie.director, None);
        assert_eq!(movie.year, None);
        assert_eq!(movie.rating, None);
    }

    #[test]
    fn test_normalize_requires_title() {
        let mut p = payload("2010", "8.8", "Christopher Nolan");
        p.title = None;

        assert!(matches!(
            normalize_payload(p),
            Err(OmdbError::ParseError(_))
        ));
    }
}
