use super::{drain, post_event, Collector};
use crate::api::{ApiPost, Endpoint, SearchQuery};
use crate::error::Result;
use crate::fetcher::Paginator;
use crate::model::{EngagementEvent, Handle, PostId, TimeWindow};
use async_trait::async_trait;

/// Retweets of the promotional post made inside the giveaway window.
pub struct RetweetCollector {
    host: Handle,
    target: PostId,
    window: TimeWindow,
}

impl RetweetCollector {
    pub fn new(host: Handle, target: PostId, window: TimeWindow) -> Self {
        Self {
            host,
            target,
            window,
        }
    }
}

#[async_trait]
impl Collector for RetweetCollector {
    fn label(&self) -> &str {
        "re-tweets"
    }

    async fn collect(&self, paginator: &Paginator) -> Result<Vec<EngagementEvent>> {
        let endpoint = Endpoint::SearchRecent(SearchQuery::retweets_of(&self.host, self.window));

        drain::<ApiPost, _>(paginator, &endpoint, self.label(), |page, events| {
            let authors = page.includes.users_by_id();
            for post in page.items() {
                // Search matches any retweet of the host; only the giveaway post counts.
                if !post.references(&self.target) {
                    tracing::debug!(post = %post.id, "skipping retweet of another post");
                    continue;
                }
                events.push(EngagementEvent::Retweet(post_event(post, &authors)?));
            }
            Ok(())
        })
        .await
    }
}
