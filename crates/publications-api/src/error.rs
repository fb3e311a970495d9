//! Error types for the publications client

use std::fmt;

/// Errors that can occur when fetching the publications listing
#[derive(Debug)]
pub enum ApiError {
    /// HTTP request failed (connection, TLS, timeout, body read)
    Http(reqwest::Error),
    /// Upstream answered with a non-success status
    Status { status: u16, url: String },
    /// Response body is not a valid publications listing
    Json(serde_json::Error),
    /// Listing page does not reference a publications data asset
    AssetNotFound(String),
    /// Data asset path could not be resolved against the page URL
    InvalidUrl(url::ParseError),
}

impl ApiError {
    /// Whether the request hit the configured client timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Publications HTTP error: {}", e),
            Self::Status { status, url } => {
                write!(f, "Publications request to {} returned status {}", url, status)
            }
            Self::Json(e) => write!(f, "Publications JSON parse error: {}", e),
            Self::AssetNotFound(url) => {
                write!(f, "No publications data asset referenced by {}", url)
            }
            Self::InvalidUrl(e) => write!(f, "Invalid publications asset URL: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::InvalidUrl(e) => Some(e),
            Self::Status { .. } | Self::AssetNotFound(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e)
    }
}

/// Result type for publications client operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 503,
            url: "https://example.com/publications.json".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Publications request to https://example.com/publications.json returned status 503"
        );
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_json_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::from(json_err);
        assert!(!err.is_timeout());
        assert!(format!("{}", err).starts_with("Publications JSON parse error"));
    }

    #[test]
    fn test_asset_not_found_display() {
        let err = ApiError::AssetNotFound("https://example.com/pubs".to_string());
        assert!(format!("{}", err).contains("https://example.com/pubs"));
    }
}
