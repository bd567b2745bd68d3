//! Reqwest-backed [`SeedFeedSource`] for WordPress sites.
//!
//! Owns transport concerns only: the request, its timeout, status handling
//! and decoding. Entries that do not match the expected shape are counted and
//! dropped here; validation of decoded entries belongs to the importer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::warn;

use super::dto::WordPressPostDto;
use crate::domain::ports::{SeedFeed, SeedFeedError, SeedFeedSource};

/// Request timeout used by `init-db`.
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("bloggr/", env!("CARGO_PKG_VERSION"));

/// Fetches posts from a WordPress REST endpoint over HTTPS.
pub struct WordPressFeedSource {
    client: Client,
}

impl WordPressFeedSource {
    /// Build a source whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SeedFeedSource for WordPressFeedSource {
    async fn fetch_posts(&self, feed_url: &str) -> Result<SeedFeed, SeedFeedError> {
        let url = Url::parse(feed_url).map_err(|error| SeedFeedError::invalid_url(error.to_string()))?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        decode_feed(body.as_ref())
    }
}

fn map_transport_error(error: reqwest::Error) -> SeedFeedError {
    if error.is_timeout() {
        SeedFeedError::transport(format!("timed out: {error}"))
    } else {
        SeedFeedError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> SeedFeedError {
    SeedFeedError::status(status.as_u16())
}

fn decode_feed(body: &[u8]) -> Result<SeedFeed, SeedFeedError> {
    let entries: Vec<Value> = serde_json::from_slice(body)
        .map_err(|error| SeedFeedError::decode(format!("expected a JSON array of posts: {error}")))?;

    let mut feed = SeedFeed::default();
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<WordPressPostDto>(entry) {
            Ok(dto) => feed.items.push(dto.into_domain()),
            Err(error) => {
                warn!(index, %error, "dropping undecodable feed entry");
                feed.undecodable += 1;
            }
        }
    }
    Ok(feed)
}
