//! Port for fetching the external post feed used to seed the blog.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised while fetching the seed feed. All of them abort the
    /// import before anything is reset.
    pub enum SeedFeedError {
        /// The URL was rejected before any request was made.
        InvalidUrl { message: String } => "seed feed url is invalid: {message}",
        /// The request failed or timed out.
        Transport { message: String } => "seed feed request failed: {message}",
        /// The server answered with a non-success status.
        Status { status: u16 } => "seed feed returned HTTP {status}",
        /// The payload was not a JSON array.
        Decode { message: String } => "seed feed payload could not be decoded: {message}",
    }
}

/// One decoded feed entry, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFeedItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub subtitle: String,
    pub img_url: String,
    /// Publication timestamp as sent by the feed, `%Y-%m-%dT%H:%M:%S`.
    pub published_at: String,
    pub author_name: String,
}

/// Decoded feed plus the number of entries that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeedFeed {
    pub items: Vec<SeedFeedItem>,
    pub undecodable: usize,
}

/// Port for fetching the seed feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedFeedSource: Send + Sync {
    async fn fetch_posts(&self, feed_url: &str) -> Result<SeedFeed, SeedFeedError>;
}
