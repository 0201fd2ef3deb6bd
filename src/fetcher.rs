use crate::api::types::decode_page;
use crate::api::{Endpoint, Page, Transport};
use crate::error::Result;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Pause between consecutive page requests of one pagination run.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(1600);

enum Cursor {
    First,
    Next(String),
    Exhausted,
}

/// Follows continuation cursors until the platform stops returning one.
///
/// The stream ends cleanly once a page omits its cursor. A failed page is
/// yielded as the final `Err` item, so callers can tell an exhausted listing
/// from an aborted one. Rate limiting is surfaced, never retried.
#[derive(Clone)]
pub struct Paginator {
    transport: Arc<dyn Transport>,
    base: Url,
    page_delay: Duration,
}

impl Paginator {
    pub fn new(transport: Arc<dyn Transport>, base: Url, page_delay: Duration) -> Self {
        Self {
            transport,
            base,
            page_delay,
        }
    }

    /// Lazily fetch every page of `endpoint`.
    pub fn fetch_all<'a, T>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> impl Stream<Item = Result<Page<T>>> + Send + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        stream::try_unfold(Cursor::First, move |cursor| {
            self.next_page::<T>(endpoint, cursor)
        })
    }

    /// Drain `endpoint` into memory, discarding everything if any page fails.
    pub async fn collect_all<T>(&self, endpoint: &Endpoint) -> Result<Vec<Page<T>>>
    where
        T: DeserializeOwned + Send,
    {
        self.fetch_all(endpoint).try_collect().await
    }

    async fn next_page<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        cursor: Cursor,
    ) -> Result<Option<(Page<T>, Cursor)>> {
        let token = match cursor {
            Cursor::Exhausted => return Ok(None),
            Cursor::First => None,
            Cursor::Next(token) => {
                tokio::time::sleep(self.page_delay).await;
                Some(token)
            }
        };

        let url = endpoint.url(&self.base, token.as_deref())?;
        let response = self.transport.get(&url).await?;
        let page: Page<T> = decode_page(&response)?;

        let next = match (endpoint.cursor_param(), page.next_token()) {
            (Some(_), Some(next)) => {
                tracing::debug!(cursor = next, "more pages available");
                Cursor::Next(next.to_string())
            }
            _ => Cursor::Exhausted,
        };

        Ok(Some((page, next)))
    }
}
