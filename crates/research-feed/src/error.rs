//! Error types for the research feed

use publications_api::ApiError;
use std::fmt;

#[derive(Debug)]
pub enum FeedError {
    /// Upstream unreachable, timed out, or answered with a non-success status
    UpstreamFetch(ApiError),
    /// Upstream data does not have the expected shape
    UpstreamFormat(String),
    /// RSS serialization failed
    Render(rss::Error),
    /// Refresh task ended without producing a result
    Refresh(String),
    Config(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::UpstreamFetch(err) => write!(f, "Upstream fetch error: {}", err),
            FeedError::UpstreamFormat(msg) => write!(f, "Upstream format error: {}", msg),
            FeedError::Render(err) => write!(f, "Render error: {}", err),
            FeedError::Refresh(msg) => write!(f, "Refresh task error: {}", msg),
            FeedError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::UpstreamFetch(err) => Some(err),
            FeedError::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for FeedError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Json(e) => FeedError::UpstreamFormat(format!("invalid listing: {}", e)),
            other => FeedError::UpstreamFetch(other),
        }
    }
}

impl From<rss::Error> for FeedError {
    fn from(err: rss::Error) -> Self {
        FeedError::Render(err)
    }
}

impl From<tracing_subscriber::filter::ParseError> for FeedError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        FeedError::Config(err.to_string())
    }
}

impl From<std::io::Error> for FeedError {
    fn from(err: std::io::Error) -> Self {
        FeedError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_format_error_display() {
        let err = FeedError::UpstreamFormat("filename \"paper.html\" does not match".to_string());
        assert_eq!(
            format!("{}", err),
            "Upstream format error: filename \"paper.html\" does not match"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = FeedError::Config("MAX_ENTRIES must be positive".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: MAX_ENTRIES must be positive"
        );
    }

    #[test]
    fn test_refresh_error_display() {
        let err = FeedError::Refresh("task was cancelled".to_string());
        assert_eq!(format!("{}", err), "Refresh task error: task was cancelled");
    }

    #[test]
    fn test_json_api_error_becomes_format_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = FeedError::from(ApiError::Json(json_err));
        assert!(matches!(err, FeedError::UpstreamFormat(_)));
    }

    #[test]
    fn test_status_api_error_becomes_fetch_error() {
        let err = FeedError::from(ApiError::Status {
            status: 500,
            url: "https://example.com".to_string(),
        });
        assert!(matches!(err, FeedError::UpstreamFetch(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_is_debug() {
        let err = FeedError::Config("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}
