use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use zephyr_fetch::{CachedFetcher, DataProvider, FetchCache, HttpProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Observability
    zephyr_obs::init("zephyrd");

    // Config
    let cfg = zephyr_config::AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid config, using defaults");
        zephyr_config::AppConfig::default()
    });

    // Provider and cache
    let provider = HttpProvider::new(&cfg.provider_base_url(), cfg.provider_timeout())
        .context("failed to build forecast provider")?;
    tracing::info!(provider = provider.name(), base_url = %provider.base_url(), "forecast provider configured");
    let ttl = chrono::Duration::from_std(cfg.cache_ttl()).context("cache ttl out of range")?;
    let fetcher = Arc::new(CachedFetcher::new(Arc::new(provider), FetchCache::new(ttl)));

    // Build app and state
    let (app, state) = zephyr_api::build_app(fetcher, cfg.default_forecast_hour())?;

    // Start HTTP server
    let addr: SocketAddr = cfg.http_bind().parse().context("invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    zephyr_api::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
