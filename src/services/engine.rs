use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::sync::RwLock;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{FilterRequest, MovieRecord, RecommendationItem, UserSignal},
    services::{
        catalog::CatalogIndex, favorites::resolve_favorites, providers::CatalogProvider, ranker,
    },
};

/// Index installed by a fit, tagged with the generation it was issued
struct Installed {
    generation: u64,
    index: Arc<CatalogIndex>,
}

/// Owner of the fitted catalog
///
/// Readers take a snapshot (`Arc<CatalogIndex>`) and rank against it without
/// holding the lock. A refit builds the new index completely before swapping
/// it in, so a request sees either the old catalog or the new one.
///
/// Every fit draws a generation number when it starts. An index is only
/// installed if no later generation is already live, so overlapping refits
/// cannot roll the catalog back to an older fetch.
#[derive(Clone, Default)]
pub struct RecommendationEngine {
    current: Arc<RwLock<Option<Installed>>>,
    issued: Arc<AtomicU64>,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Rebuilds the index from `records` and installs it; returns the movie count
    pub async fn fit(&self, records: Vec<MovieRecord>) -> AppResult<usize> {
        let generation = self.next_generation();
        self.fit_generation(generation, records).await
    }

    #[instrument(skip(self, records), fields(records = records.len()))]
    async fn fit_generation(
        &self,
        generation: u64,
        records: Vec<MovieRecord>,
    ) -> AppResult<usize> {
        let index = tokio::task::spawn_blocking(move || CatalogIndex::fit(records))
            .await
            .map_err(|e| AppError::Internal(format!("Index build task failed: {}", e)))?;
        let count = index.len();
        let vocabulary = index.vectorizer().vocabulary_len();

        let mut current = self.current.write().await;
        if let Some(live) = current.as_ref().filter(|live| live.generation > generation) {
            tracing::warn!(
                generation,
                live = live.generation,
                "Discarding index superseded by a newer fit"
            );
            return Ok(count);
        }
        *current = Some(Installed {
            generation,
            index: Arc::new(index),
        });
        drop(current);

        tracing::info!(count, vocabulary, generation, "Catalog index fitted");
        Ok(count)
    }

    /// Fetches the catalog from `provider` and refits
    ///
    /// A failed fetch leaves the current index in place.
    #[instrument(skip(self, provider), fields(provider = provider.name()))]
    pub async fn refit_from(&self, provider: &dyn CatalogProvider) -> AppResult<usize> {
        let generation = self.next_generation();
        let records = provider.fetch_catalog().await.map_err(|e| {
            tracing::error!(error = %e, "Catalog fetch failed, keeping current index");
            match e {
                AppError::UpstreamFetch(_) => e,
                other => AppError::UpstreamFetch(other.to_string()),
            }
        })?;
        self.fit_generation(generation, records).await
    }

    /// Current fitted index
    pub async fn snapshot(&self) -> AppResult<Arc<CatalogIndex>> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|live| Arc::clone(&live.index))
            .ok_or(AppError::NotFitted)
    }

    pub async fn is_fitted(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Number of movies in the current index, zero when unfitted
    pub async fn movie_count(&self) -> usize {
        self.current
            .read()
            .await
            .as_ref()
            .map_or(0, |live| live.index.len())
    }

    /// Resolves favorites and ranks against a single snapshot
    pub async fn recommend(
        &self,
        filters: &FilterRequest,
        signals: &[UserSignal],
        top_n: usize,
    ) -> AppResult<Vec<RecommendationItem>> {
        let index = self.snapshot().await?;
        let favorites = resolve_favorites(&index, &filters.favorite_movies, signals);
        tracing::debug!(favorites = favorites.len(), "Resolved favorites");
        ranker::recommend(&index, filters, &favorites, top_n)
    }

    /// Favorites as they would be pinned for this request
    pub async fn resolve_favorites(
        &self,
        explicit: &[String],
        signals: &[UserSignal],
    ) -> AppResult<Vec<String>> {
        let index = self.snapshot().await?;
        Ok(resolve_favorites(&index, explicit, signals))
    }
}
