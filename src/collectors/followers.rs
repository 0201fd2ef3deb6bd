use super::{drain, Collector};
use crate::api::{ApiUser, Endpoint};
use crate::error::Result;
use crate::fetcher::Paginator;
use crate::model::{AccountId, EngagementEvent};
use async_trait::async_trait;

/// Current followers of the host account. Followers have no time dimension.
pub struct FollowerCollector {
    host_id: AccountId,
}

impl FollowerCollector {
    pub fn new(host_id: AccountId) -> Self {
        Self { host_id }
    }
}

#[async_trait]
impl Collector for FollowerCollector {
    fn label(&self) -> &str {
        "followers"
    }

    async fn collect(&self, paginator: &Paginator) -> Result<Vec<EngagementEvent>> {
        let endpoint = Endpoint::Followers(self.host_id.clone());

        drain::<ApiUser, _>(paginator, &endpoint, self.label(), |page, events| {
            events.extend(page.items().iter().map(|user| EngagementEvent::Follow {
                account: user.to_account(),
            }));
            Ok(())
        })
        .await
    }
}
