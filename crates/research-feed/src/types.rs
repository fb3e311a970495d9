//! Core types for the research feed

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use publications_api::Year;
use serde::{Deserialize, Serialize};

/// A publication that passed every filter, ready to become a feed entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPublication {
    pub id: u64,
    pub title: String,
    pub url: String,
    /// String form of `id`; not a permalink
    pub guid: String,
    /// Upstream tags, verbatim and in upstream order
    pub categories: Vec<String>,
    pub description: Option<String>,
    pub year: Option<Year>,
}

/// Feed-level metadata, identical for every render
#[derive(Debug, Clone)]
pub struct FeedMetadata {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// A rendered feed document and when it was rendered
#[derive(Debug, Clone)]
pub struct CachedFeed {
    pub body: Bytes,
    pub rendered_at: DateTime<Utc>,
    pub entries: usize,
}

/// Statistics about the feed cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub failures: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.failures, 0);
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            uptime_secs: 3600,
            cache: CacheStats {
                entries: 1,
                hits: 41,
                misses: 2,
                failures: 1,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["uptime_secs"], 3600);
        assert_eq!(json["cache"]["hits"], 41);
        assert_eq!(json["cache"]["failures"], 1);
    }
}
