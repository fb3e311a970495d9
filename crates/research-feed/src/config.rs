use crate::error::{FeedError, Result};
use crate::pub_id::FilenamePattern;
use publications_api::PublicationsClient;
use std::env;
use std::time::Duration;

pub const DEFAULT_RESEARCH_AREAS: &[&str] = &[
    "Data Mining and Modeling",
    "Machine Intelligence",
    "Machine Perception",
    "Machine Translation",
    "Natural Language Processing",
    "Robotics",
];

/// Placeholder substituted with the publication id in `id_url_template`
pub const ID_PLACEHOLDER: &str = "{id}";

/// Feed configuration parsed from environment variables
///
/// Values are fixed for the life of the process; changing them means
/// redeploying with a different environment.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub port: u16,
    pub ttl: Duration,
    pub max_entries: usize,
    pub upstream_url: String,
    /// When set, the listing URL is discovered from this page instead of using `upstream_url`
    pub discovery_page_url: Option<String>,
    pub request_timeout: Duration,
    pub id_url_template: String,
    pub whitelist_areas: Vec<String>,
    pub filename_pattern: String,
    pub description_limit: usize,
    pub feed_title: String,
    pub feed_description: String,
    pub feed_self_link: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            port: 3005,
            ttl: Duration::from_secs(3 * 60 * 60),
            max_entries: 100,
            upstream_url: PublicationsClient::DEFAULT_LISTING_URL.to_string(),
            discovery_page_url: None,
            request_timeout: Duration::from_secs(30),
            id_url_template: "https://ai.google/research/pubs/pub{id}".to_string(),
            whitelist_areas: DEFAULT_RESEARCH_AREAS
                .iter()
                .map(|a| a.to_string())
                .collect(),
            filename_pattern: r"pub(\d+)\.html".to_string(),
            description_limit: 1000,
            feed_title: "Google AI publications RSS feed (unofficial)".to_string(),
            feed_description:
                "As a disclaimer, this is an unofficial feed and has no affiliation with Google."
                    .to_string(),
            feed_self_link: "https://github.com/ml-feeds/google-ai-feed".to_string(),
        }
    }
}

impl FeedConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Parse configuration from an arbitrary variable lookup
    ///
    /// Unset or unparsable numeric values fall back to the defaults.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| var(key).and_then(|v| v.trim().parse::<u64>().ok());

        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let ttl = parsed("CACHE_TTL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.ttl);

        let max_entries = parsed("MAX_ENTRIES")
            .map(|n| n as usize)
            .unwrap_or(defaults.max_entries);

        let request_timeout = parsed("REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let description_limit = parsed("DESCRIPTION_LIMIT")
            .map(|n| n as usize)
            .unwrap_or(defaults.description_limit);

        let whitelist_areas = var("RESEARCH_AREAS")
            .map(|s| {
                s.split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.whitelist_areas);

        Self {
            port,
            ttl,
            max_entries,
            upstream_url: var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            discovery_page_url: var("DISCOVERY_PAGE_URL").filter(|u| !u.is_empty()),
            request_timeout,
            id_url_template: var("PUB_URL_TEMPLATE").unwrap_or(defaults.id_url_template),
            whitelist_areas,
            filename_pattern: var("FILENAME_PATTERN").unwrap_or(defaults.filename_pattern),
            description_limit,
            feed_title: var("FEED_TITLE").unwrap_or(defaults.feed_title),
            feed_description: var("FEED_DESCRIPTION").unwrap_or(defaults.feed_description),
            feed_self_link: var("FEED_SELF_LINK").unwrap_or(defaults.feed_self_link),
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(FeedError::Config("MAX_ENTRIES must be positive".to_string()));
        }
        if self.ttl.is_zero() {
            return Err(FeedError::Config("CACHE_TTL_SECS must be positive".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(FeedError::Config(
                "REQUEST_TIMEOUT_SECS must be positive".to_string(),
            ));
        }
        if !self.id_url_template.contains(ID_PLACEHOLDER) {
            return Err(FeedError::Config(format!(
                "PUB_URL_TEMPLATE must contain {}",
                ID_PLACEHOLDER
            )));
        }
        if self.whitelist_areas.is_empty() {
            return Err(FeedError::Config("RESEARCH_AREAS is empty".to_string()));
        }
        FilenamePattern::new(&self.filename_pattern)?;
        Ok(())
    }
}
