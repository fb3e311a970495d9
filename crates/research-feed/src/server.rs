//! HTTP server for the feed
//!
//! Provides /, /feed and /health endpoints.

use crate::cache::FeedCache;
use crate::types::HealthResponse;
use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Shared state for the HTTP server
pub struct ServerState {
    pub cache: FeedCache,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(cache: FeedCache) -> Self {
        Self {
            cache,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(get_feed))
        .route("/feed", get(get_feed))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: state.cache.stats(),
    })
}

/// Current RSS document
async fn get_feed(State(state): State<SharedState>) -> Response {
    match state.cache.get_or_refresh().await {
        Ok(lookup) => {
            let cache_header = if lookup.refreshed { "MISS" } else { "HIT" };
            let cache_control = format!("public, max-age={}", state.cache.ttl().as_secs());

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, RSS_CONTENT_TYPE.to_string()),
                    (header::CACHE_CONTROL, cache_control),
                    (X_CACHE, cache_header.to_string()),
                ],
                lookup.feed.body,
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to serve feed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Feed is temporarily unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING: &str = r#"{"publications": [
        {"filename_html": "pub1234.html", "title": "A", "tag_pks": ["research-area-robotics"], "bibtex": "@a{x,\n\tURL\t= {u}\n}", "year": "2020"}
    ]}"#;

    fn create_test_state(server: &MockServer) -> SharedState {
        let config = FeedConfig {
            upstream_url: format!("{}/publications.json", server.uri()),
            whitelist_areas: vec!["Robotics".to_string()],
            ..FeedConfig::default()
        };
        Arc::new(ServerState::new(FeedCache::new(&config).unwrap()))
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = MockServer::start().await;
        let router = create_router(create_test_state(&server));

        let response = get(router, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].as_u64().is_some());
        assert!(json["cache"]["hits"].as_u64().is_some());
    }

    #[tokio::test]
    async fn test_feed_endpoint_serves_rss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .expect(1)
            .mount(&server)
            .await;
        let router = create_router(create_test_state(&server));

        let first = get(router.clone(), "/feed").await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[header::CONTENT_TYPE], RSS_CONTENT_TYPE);
        assert_eq!(first.headers()["x-cache"], "MISS");
        assert_eq!(first.headers()[header::CACHE_CONTROL], "public, max-age=10800");
        let first_body = axum::body::to_bytes(first.into_body(), usize::MAX)
            .await
            .unwrap();

        let second = get(router, "/").await;
        assert_eq!(second.headers()["x-cache"], "HIT");
        let second_body = axum::body::to_bytes(second.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(first_body, second_body);

        let channel = rss::Channel::read_from(&first_body[..]).unwrap();
        assert_eq!(channel.items().len(), 1);
        let item = &channel.items()[0];
        assert_eq!(item.guid().unwrap().value(), "1234");
        assert!(item.link().unwrap().ends_with("pub1234"));
    }

    #[tokio::test]
    async fn test_feed_endpoint_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let router = create_router(create_test_state(&server));

        let response = get(router, "/feed").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().is_some());
    }

    #[test]
    fn test_server_state_new() {
        let cache = FeedCache::new(&FeedConfig::default()).unwrap();
        let state = ServerState::new(cache);

        let diff = (Utc::now() - state.started_at).num_seconds();
        assert!((0..5).contains(&diff));
    }
}
