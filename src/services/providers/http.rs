/// Catalog provider backed by the movie service's REST API
///
/// API Flow:
/// 1. Catalog: GET {catalog_api_url} → JSON array of movie records
/// 2. Reviews: GET {reviews_api_url}?userEmail=... → JSON array of reviews
///
/// Entries that fail to deserialize are skipped rather than failing the batch.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{MovieRecord, UserSignal},
    services::providers::CatalogProvider,
};

#[derive(Clone)]
pub struct HttpCatalogProvider {
    http_client: HttpClient,
    catalog_url: String,
    reviews_url: String,
}

impl HttpCatalogProvider {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            catalog_url: config.catalog_api_url.clone(),
            reviews_url: config.reviews_api_url.clone(),
        })
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> AppResult<Vec<T>> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("GET {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamFetch(format!(
                "{} returned status {}: {}",
                url, status, body
            )));
        }

        let entries: Vec<Value> = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("Invalid payload from {}: {}", url, e)))?;

        Ok(parse_entries(entries))
    }
}

fn parse_entries<T: DeserializeOwned>(entries: Vec<Value>) -> Vec<T> {
    let total = entries.len();
    let parsed: Vec<T> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    if parsed.len() < total {
        tracing::warn!(
            skipped = total - parsed.len(),
            "Skipped malformed upstream entries"
        );
    }
    parsed
}

#[async_trait::async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_catalog(&self) -> AppResult<Vec<MovieRecord>> {
        let movies: Vec<MovieRecord> = self.get_list(&self.catalog_url, &[]).await?;
        tracing::debug!(count = movies.len(), "Fetched movie catalog");
        Ok(movies)
    }

    async fn fetch_user_signals(&self, user_email: &str) -> AppResult<Vec<UserSignal>> {
        self.get_list(&self.reviews_url, &[("userEmail", user_email)])
            .await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
