use super::{RawResponse, Transport};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

const USER_AGENT: &str = concat!("giveaway/", env!("CARGO_PKG_VERSION"));

pub struct HttpTransport {
    bearer_token: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(bearer_token: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            bearer_token,
            client,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
