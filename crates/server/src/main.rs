//! HTTP front end for the recommender.
//!
//! Loads the catalog once, then serves the selection page and JSON API.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use data_loader::CatalogIndex;
use server::Config;
use server::api::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.tmdb_api_key.is_empty() {
        warn!("TMDB_API_KEY is not set; every poster will fall back to the placeholder");
    }

    info!("Loading catalog from {}", config.data_dir.display());
    let catalog = Arc::new(
        CatalogIndex::load_from_dir(&config.data_dir)
            .context("Failed to load movie catalog and similarity matrix")?,
    );

    let posters = config
        .poster_resolver()
        .context("Failed to build poster client")?;
    let app = create_router(AppState::new(catalog, posters));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving movie recommendations on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
