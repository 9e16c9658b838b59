use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::middleware::RequestId;
use crate::models::{FilterRequest, RecommendResponse, UserSignal};

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    pub user_email: Option<String>,
}

/// Service banner
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Movie Recommender API running" }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let fitted = state.engine.is_fitted().await;
    let movies = state.engine.movie_count().await;
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "fitted": fitted, "movies": movies })),
    )
}

/// Ranks the catalog for the given filters and favorites
///
/// When `user_email` is present the user's positively rated titles are added
/// to the favorites. A failed review fetch only drops those extra favorites.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendQuery>,
    Json(filters): Json<FilterRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let signals = match query.user_email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => fetch_signals(&state, email).await,
        _ => Vec::new(),
    };

    let results = state
        .engine
        .recommend(&filters, &signals, state.top_n)
        .await?;

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        signals = signals.len(),
        "Recommendations served"
    );
    Ok(Json(RecommendResponse { results }))
}

async fn fetch_signals(state: &AppState, email: &str) -> Vec<UserSignal> {
    match state.provider.fetch_user_signals(email).await {
        Ok(signals) => signals,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = state.provider.name(),
                "User signal fetch failed, continuing without implicit favorites"
            );
            Vec::new()
        }
    }
}

/// Refetches the catalog and refits the index
pub async fn retrain(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let count = state.engine.refit_from(state.provider.as_ref()).await?;
    Ok(Json(json!({ "status": "ok", "count": count })))
}
