use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinelog_api::{
    api::{create_router, AppState},
    config::Config,
    db::{self, Cache},
    services::{MovieCatalog, TmdbCatalog},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinelog_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // The cache is optional; a Redis outage at startup only disables it
    let cache = match config.redis_url.as_deref() {
        Some(url) => match Cache::connect(url).await {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, catalog cache disabled");
                None
            }
        },
        None => None,
    };

    let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbCatalog::new(
        config.tmdb_access_token.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
        cache,
    ));
    let collection = db::open_collection(&config).await?;

    let state = AppState::new(collection, catalog, &config.tmdb_image_url);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, backend = ?config.storage_backend, "Server running");

    axum::serve(listener, app).await?;
    Ok(())
}
