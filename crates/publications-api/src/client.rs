//! Publications listing HTTP client

use crate::error::{ApiError, Result};
use crate::types::{PublicationListing, RawPublication};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// JavaScript assignment on the publications page that points at the data asset
static ASSET_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"publicationsJsonUrl\s*=\s*["']([^"']+)["']"#)
        .expect("asset path pattern is valid")
});

/// Client for the publications listing
///
/// Every request is bounded by the timeout given at construction; a request
/// that exceeds it fails with [`ApiError::Http`] and [`ApiError::is_timeout`]
/// returns true.
#[derive(Clone)]
pub struct PublicationsClient {
    http: reqwest::Client,
}

impl PublicationsClient {
    /// Static JSON listing
    pub const DEFAULT_LISTING_URL: &'static str =
        "https://ai.google/static/data/publications.json";

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Fetch and validate the JSON listing at `url`
    pub async fn fetch_listing(&self, url: &str) -> Result<Vec<RawPublication>> {
        debug!(url = %url, "Fetching publications listing");
        let body = self.get_bytes(url).await?;
        let listing: PublicationListing = serde_json::from_slice(&body)?;
        debug!(
            url = %url,
            size = body.len(),
            publications = listing.publications.len(),
            "Fetched publications listing"
        );
        Ok(listing.publications)
    }

    /// Load the publications page and return the absolute URL of its data asset
    pub async fn discover_listing_url(&self, page_url: &str) -> Result<String> {
        debug!(url = %page_url, "Discovering publications data asset");
        let body = self.get_bytes(page_url).await?;
        let html = String::from_utf8_lossy(&body);

        let path = Self::extract_asset_path(&html)
            .ok_or_else(|| ApiError::AssetNotFound(page_url.to_string()))?;
        let resolved = Url::parse(page_url)?.join(path)?;

        debug!(url = %page_url, asset = %resolved, "Resolved publications data asset");
        Ok(resolved.into())
    }

    /// Two-step fetch: discover the data asset from the page, then fetch it
    pub async fn fetch_discovered_listing(&self, page_url: &str) -> Result<Vec<RawPublication>> {
        let listing_url = self.discover_listing_url(page_url).await?;
        self.fetch_listing(&listing_url).await
    }

    /// Extract the data asset path assigned in the page's JavaScript
    pub fn extract_asset_path(html: &str) -> Option<&str> {
        ASSET_PATH_RE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
