use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use countryapi::config::AppConfig;
use countryapi::state::AppState;
use countryapi::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    seed::seed_continents(&db)
        .await
        .context("Failed to seed continents")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { db, config };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
