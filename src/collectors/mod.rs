pub mod followers;
pub mod replies;
pub mod retweets;

pub use followers::FollowerCollector;
pub use replies::ReplyCollector;
pub use retweets::RetweetCollector;

use crate::api::{ApiPost, ApiUser, Endpoint, Page};
use crate::error::{GiveawayError, Result};
use crate::fetcher::Paginator;
use crate::model::{post_url, AccountRef, EngagementEvent, PostEvent, PostId};
use async_trait::async_trait;
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::pin::pin;

/// One engagement signal, gathered by paging an endpoint to exhaustion.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Human readable name of what is collected, e.g. "followers".
    fn label(&self) -> &str;

    async fn collect(&self, paginator: &Paginator) -> Result<Vec<EngagementEvent>>;
}

/// Drain `endpoint`, turning each page into events. Any failed page fails the whole collection.
async fn drain<T, F>(
    paginator: &Paginator,
    endpoint: &Endpoint,
    label: &str,
    mut on_page: F,
) -> Result<Vec<EngagementEvent>>
where
    T: DeserializeOwned + Send,
    F: FnMut(Page<T>, &mut Vec<EngagementEvent>) -> Result<()> + Send,
{
    let mut pages = pin!(paginator.fetch_all::<T>(endpoint));
    let mut events = Vec::new();

    while let Some(page) = pages.try_next().await? {
        if page.data.is_none() {
            tracing::debug!(label, "page carried no data");
        }
        on_page(page, &mut events)?;
        tracing::info!(label, found = events.len(), "Found {} {}...", events.len(), label);
    }

    Ok(events)
}

/// Join a post with its side-loaded author.
fn post_event(post: &ApiPost, authors: &HashMap<&str, &ApiUser>) -> Result<PostEvent> {
    let author_id = post.author_id.as_deref().ok_or_else(|| {
        GiveawayError::DataIntegrity(format!("post {} has no author_id", post.id))
    })?;
    let author: AccountRef = authors
        .get(author_id)
        .map(|user| user.to_account())
        .ok_or_else(|| {
            GiveawayError::DataIntegrity(format!(
                "author {} of post {} missing from includes.users",
                author_id, post.id
            ))
        })?;

    let post_id = PostId::new(post.id.clone());
    Ok(PostEvent {
        url: post_url(&post_id, &author.id),
        post_id,
        text: post.text.clone(),
        author,
    })
}
