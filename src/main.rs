use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use streamrec::api::{create_router, AppState};
use streamrec::config::Config;
use streamrec::ingest;
use streamrec::services::RecommendationEngine;
use streamrec::store::UserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let items = ingest::load_catalog(&config.catalog_path)
        .with_context(|| format!("failed to load catalog from {}", config.catalog_path))?;
    let ratings = if Path::new(&config.ratings_path).exists() {
        ingest::load_ratings(&config.ratings_path)
            .with_context(|| format!("failed to load ratings from {}", config.ratings_path))?
    } else {
        warn!(
            "no ratings table at {}; collaborative recommendations disabled",
            config.ratings_path
        );
        Vec::new()
    };

    let engine = RecommendationEngine::from_tables(items, &ratings);
    let users = UserStore::open(&config.user_data_dir)?;

    let app = create_router(AppState::new(engine, users));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
