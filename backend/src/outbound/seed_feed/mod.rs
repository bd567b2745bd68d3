//! WordPress feed adapter for the seed import.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_FEED_TIMEOUT, WordPressFeedSource};
