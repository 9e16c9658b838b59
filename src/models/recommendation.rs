use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Movie;

/// Filters and favorites supplied with a recommendation request
///
/// Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// Genres to match (any overlap)
    #[serde(default)]
    pub genres: Vec<String>,
    /// Exact language match, case-insensitive
    #[serde(default)]
    pub language: Option<String>,
    /// One of the era labels offered by the frontend
    #[serde(default)]
    pub era: Option<String>,
    /// Titles the user explicitly likes; matched titles are pinned first
    #[serde(default)]
    pub favorite_movies: Vec<String>,
}

impl FilterRequest {
    /// Language filter, if set to something non-blank
    pub fn active_language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// Era filter, if set to something non-empty
    pub fn active_era(&self) -> Option<&str> {
        self.era.as_deref().filter(|e| !e.is_empty())
    }
}

/// One entry of a recommendation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    #[serde(rename = "movieID")]
    pub movie_id: Option<Value>,
    pub title: String,
    pub image: Option<String>,
    pub language: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    /// 1.0 for pinned favorites, cosine similarity otherwise
    pub score: f64,
}

impl RecommendationItem {
    pub fn from_movie(movie: &Movie, score: f64) -> Self {
        Self {
            movie_id: movie.movie_id.clone(),
            title: movie.title.clone(),
            image: movie.image.clone(),
            language: movie.language.clone(),
            year: movie.year,
            genres: movie.genres.clone(),
            score,
        }
    }
}

/// Body returned by the recommend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub results: Vec<RecommendationItem>,
}

/// A rated title from the user's review history
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSignal {
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}
