pub mod client;
pub mod request;
pub mod types;

#[cfg(test)]
pub mod mock;

use crate::error::Result;
use async_trait::async_trait;
use reqwest::Url;

pub use client::HttpTransport;
pub use request::{Endpoint, SearchQuery};
pub use types::{ApiPost, ApiUser, Includes, Meta, Page};

pub const TWITTER_API_BASE: &str = "https://api.twitter.com/2/";

/// A status code and undecoded body for one GET.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can perform an authorized GET against the platform.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse>;
}
