//! Rust client for the Google AI research publications listing
//!
//! The listing is a single JSON document with a top-level `publications`
//! array. It is either fetched directly from its static data URL, or found
//! by loading the publications HTML page and following the data asset path
//! that the page assigns to a JavaScript variable.
//!
//! # Example
//!
//! ```no_run
//! use publications_api::PublicationsClient;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), publications_api::ApiError> {
//! let client = PublicationsClient::with_timeout(Duration::from_secs(30))?;
//!
//! let publications = client
//!     .fetch_listing(PublicationsClient::DEFAULT_LISTING_URL)
//!     .await?;
//! for publication in publications {
//!     println!("{} ({})", publication.title, publication.filename_html);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod types;

pub use client::PublicationsClient;
pub use error::{ApiError, Result};
pub use types::{PublicationListing, RawPublication, Year};
