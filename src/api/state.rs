use std::sync::Arc;

use crate::services::{CatalogProvider, RecommendationEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: RecommendationEngine,
    pub provider: Arc<dyn CatalogProvider>,
    /// Ranked results per request, favorites excluded
    pub top_n: usize,
}

impl AppState {
    pub fn new(
        engine: RecommendationEngine,
        provider: Arc<dyn CatalogProvider>,
        top_n: usize,
    ) -> Self {
        Self {
            engine,
            provider,
            top_n,
        }
    }
}
