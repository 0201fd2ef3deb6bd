use super::{drain, post_event, Collector};
use crate::api::{ApiPost, Endpoint, SearchQuery};
use crate::error::Result;
use crate::fetcher::Paginator;
use crate::model::{EngagementEvent, Hashtag, PostId};
use async_trait::async_trait;

/// Replies in the promotional post's thread that carry the giveaway hashtag.
pub struct ReplyCollector {
    conversation: PostId,
    hashtag: Hashtag,
    label: String,
}

impl ReplyCollector {
    pub fn new(conversation: PostId, hashtag: Hashtag) -> Self {
        let label = format!("{} tweet comments", hashtag);
        Self {
            conversation,
            hashtag,
            label,
        }
    }
}

#[async_trait]
impl Collector for ReplyCollector {
    fn label(&self) -> &str {
        &self.label
    }

    async fn collect(&self, paginator: &Paginator) -> Result<Vec<EngagementEvent>> {
        let endpoint = Endpoint::SearchRecent(SearchQuery::hashtag_replies(
            &self.conversation,
            &self.hashtag,
        ));

        drain::<ApiPost, _>(paginator, &endpoint, self.label(), |page, events| {
            let authors = page.includes.users_by_id();
            for post in page.items() {
                events.push(EngagementEvent::Reply(post_event(post, &authors)?));
            }
            Ok(())
        })
        .await
    }
}
