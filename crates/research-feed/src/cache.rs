//! Time-bounded cache of the rendered feed
//!
//! Holds a single rendered document. A document older than the TTL is never
//! served; the next request after expiry re-runs fetch, pipeline and render,
//! and concurrent requests arriving meanwhile wait for that same refresh.

use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::pipeline::FeedPipeline;
use crate::render::{humanize_len, render_feed};
use crate::types::{CacheStats, CachedFeed, FeedMetadata};
use axum::body::Bytes;
use chrono::Utc;
use moka::future::Cache;
use publications_api::{PublicationsClient, RawPublication};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Where the publications listing is read from
#[derive(Debug, Clone)]
enum Upstream {
    Listing(String),
    /// HTML page whose script names the listing asset
    Discovered(String),
}

/// Result of a cache lookup
#[derive(Debug, Clone)]
pub struct FeedLookup {
    pub feed: CachedFeed,
    /// Whether this call ran the refresh
    pub refreshed: bool,
}

pub struct FeedCache {
    refresher: Arc<Refresher>,
    ttl: Duration,
    cache: Cache<(), CachedFeed>,
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

/// Everything a refresh needs, shared with the task that runs it
struct Refresher {
    client: PublicationsClient,
    upstream: Upstream,
    pipeline: FeedPipeline,
    metadata: FeedMetadata,
}

impl FeedCache {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = PublicationsClient::with_timeout(config.request_timeout)
            .map_err(|e| FeedError::Config(format!("cannot build HTTP client: {}", e)))?;

        let upstream = match &config.discovery_page_url {
            Some(page) => Upstream::Discovered(page.clone()),
            None => Upstream::Listing(config.upstream_url.clone()),
        };

        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.ttl)
            .build();

        Ok(Self {
            refresher: Arc::new(Refresher {
                client,
                upstream,
                pipeline: FeedPipeline::new(config)?,
                metadata: FeedMetadata {
                    title: config.feed_title.clone(),
                    link: config.feed_self_link.clone(),
                    description: config.feed_description.clone(),
                },
            }),
            ttl: config.ttl,
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        })
    }

    /// Return the cached feed, refreshing it first if it is missing or expired
    ///
    /// The refresh runs on its own task: a caller that goes away stops
    /// waiting, but the refresh still completes and fills the cache.
    /// A failed refresh leaves the cache as it was and reports the error to
    /// every caller that waited on it; the next call tries again.
    pub async fn get_or_refresh(&self) -> std::result::Result<FeedLookup, Arc<FeedError>> {
        if let Some(feed) = self.cache.get(&()).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(FeedLookup {
                feed,
                refreshed: false,
            });
        }

        let cache = self.cache.clone();
        let refresher = Arc::clone(&self.refresher);
        let task = tokio::spawn(async move {
            cache
                .entry(())
                .or_try_insert_with(refresher.refresh())
                .await
                .map(|entry| (entry.is_fresh(), entry.into_value()))
        });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(Arc::new(FeedError::Refresh(e.to_string()))),
        };

        match outcome {
            Ok((refreshed, feed)) => {
                if refreshed {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                } else {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                }
                Ok(FeedLookup { feed, refreshed })
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Refresher {
    async fn refresh(&self) -> Result<CachedFeed> {
        let started = Instant::now();
        self.render_fresh(started).await.map_err(|e| {
            error!(
                error = %e,
                timeout = matches!(&e, FeedError::UpstreamFetch(api) if api.is_timeout()),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Feed refresh failed"
            );
            e
        })
    }

    async fn render_fresh(&self, started: Instant) -> Result<CachedFeed> {
        let publications = self.fetch().await?;
        info!(count = publications.len(), "Upstream listing has publications");

        let entries = self.pipeline.run(publications)?;
        let body = render_feed(&self.metadata, &entries)?;

        info!(
            entries = entries.len(),
            size = %humanize_len(body.len()),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered feed"
        );

        Ok(CachedFeed {
            body: Bytes::from(body),
            rendered_at: Utc::now(),
            entries: entries.len(),
        })
    }

    async fn fetch(&self) -> Result<Vec<RawPublication>> {
        let publications = match &self.upstream {
            Upstream::Listing(url) => {
                debug!(url = %url, "Reading publications listing");
                self.client.fetch_listing(url).await?
            }
            Upstream::Discovered(page) => {
                debug!(page = %page, "Reading publications listing via page discovery");
                self.client.fetch_discovered_listing(page).await?
            }
        };
        Ok(publications)
    }
}
