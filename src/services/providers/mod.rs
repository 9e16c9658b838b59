/// External collaborators feeding the recommender
///
/// The catalog service owns the movie list and the user's review history.
/// Keeping it behind a trait lets the engine be refit from any source and
/// mocked in tests.
use crate::{
    error::AppResult,
    models::{MovieRecord, UserSignal},
};

pub mod http;

pub use http::HttpCatalogProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Pulls the full current catalog
    async fn fetch_catalog(&self) -> AppResult<Vec<MovieRecord>>;

    /// Pulls the rated titles of one user
    ///
    /// Callers treat a failure here as "no signals".
    async fn fetch_user_signals(&self, user_email: &str) -> AppResult<Vec<UserSignal>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
