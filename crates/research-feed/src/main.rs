//! Research Feed - unofficial RSS feed of Google AI publications
//!
//! Serves the newest whitelisted, downloadable publications as RSS, fetching
//! the upstream listing at most once per cache TTL.

use research_feed::{start_server, FeedCache, FeedConfig, FeedError, Result, ServerState, SharedState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("research_feed=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Research Feed (Rust)...");

    let config = FeedConfig::from_env();
    config.validate()?;
    info!("Port: {}", config.port);
    match &config.discovery_page_url {
        Some(page) => info!("Upstream: discovered from {}", page),
        None => info!("Upstream: {}", config.upstream_url),
    }
    info!("Cache TTL: {} seconds", config.ttl.as_secs());
    info!("Max entries: {}", config.max_entries);
    info!("Research areas: {}", config.whitelist_areas.join(", "));

    let cache = FeedCache::new(&config)?;
    let state: SharedState = Arc::new(ServerState::new(cache));

    // Start HTTP server (blocking)
    start_server(state, config.port)
        .await
        .map_err(|e| FeedError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
