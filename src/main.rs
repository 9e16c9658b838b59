use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderName, HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    middleware::REQUEST_ID_HEADER,
    services::{HttpCatalogProvider, RecommendationEngine},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        catalog_api_url = %config.catalog_api_url,
        top_n = config.top_n,
        "Configuration loaded"
    );

    let provider = Arc::new(HttpCatalogProvider::new(&config)?);
    let engine = RecommendationEngine::new();

    // The service still starts when the catalog is down; /retrain can fit later
    match engine.refit_from(provider.as_ref()).await {
        Ok(count) => tracing::info!(count, "Initial catalog fit complete"),
        Err(e) => tracing::error!(error = %e, "Initial catalog fit failed"),
    }

    let state = AppState::new(engine, provider, config.top_n);
    let app = create_router(state).layer(cors_layer(&config.cors_origin)?);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Movie recommender listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Single allowed origin with credentials; methods and headers are mirrored
fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("Invalid CORS origin {:?}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]))
}
