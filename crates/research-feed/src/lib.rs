//! Research Feed Library
//!
//! Fetches the Google AI publications listing, keeps the publications in the
//! configured research areas that have a downloadable artifact, and serves
//! the newest of them as a cached RSS document.

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod pub_id;
pub mod render;
pub mod server;
pub mod types;

pub use cache::{FeedCache, FeedLookup};
pub use config::FeedConfig;
pub use error::{FeedError, Result};
pub use pipeline::FeedPipeline;
pub use server::{create_router, start_server, ServerState, SharedState};
pub use types::*;
