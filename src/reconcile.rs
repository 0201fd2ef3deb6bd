use crate::model::{AccountId, EngagementEvent, UserEngagementRecord};
use std::collections::BTreeMap;

pub type EngagementMap = BTreeMap<AccountId, UserEngagementRecord>;

/// Fold all three collections into one record per account.
///
/// Records are keyed by account id and ordered by it, so the result does not
/// depend on which collection is folded first.
pub fn reconcile(
    retweets: &[EngagementEvent],
    replies: &[EngagementEvent],
    follows: &[EngagementEvent],
) -> EngagementMap {
    let mut users = EngagementMap::new();
    for event in retweets.iter().chain(replies).chain(follows) {
        fold(&mut users, event);
    }
    users
}

fn fold(users: &mut EngagementMap, event: &EngagementEvent) {
    let id = &event.account().id;
    let record = users
        .entry(id.clone())
        .or_insert_with(|| UserEngagementRecord::new(id.clone()));

    match event {
        EngagementEvent::Retweet(post) => record.retweets.push(post.clone()),
        EngagementEvent::Reply(post) => record.replies.push(post.clone()),
        EngagementEvent::Follow { account } => record.follows.push(account.clone()),
    }
}

/// Records that retweeted, replied with the hashtag and follow the host, in id order.
pub fn qualified(users: &EngagementMap) -> Vec<UserEngagementRecord> {
    users
        .values()
        .filter(|record| record.is_qualified())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{post_url, AccountRef, PostEvent, PostId};

    fn account(id: &str) -> AccountRef {
        AccountRef {
            id: AccountId::new(id),
            username: format!("user{}", id),
            name: format!("User {}", id),
        }
    }

    fn post(post_id: &str, author: &str) -> PostEvent {
        let post_id = PostId::new(post_id);
        let author = account(author);
        PostEvent {
            url: post_url(&post_id, &author.id),
            post_id,
            text: "text".to_string(),
            author,
        }
    }

    fn retweet(post_id: &str, author: &str) -> EngagementEvent {
        EngagementEvent::Retweet(post(post_id, author))
    }

    fn reply(post_id: &str, author: &str) -> EngagementEvent {
        EngagementEvent::Reply(post(post_id, author))
    }

    fn follow(id: &str) -> EngagementEvent {
        EngagementEvent::Follow {
            account: account(id),
        }
    }

    #[test]
    fn test_only_full_engagement_qualifies() {
        let retweets = vec![retweet("100", "1"), retweet("101", "2")];
        let replies = vec![reply("200", "2"), reply("201", "3")];
        let follows = vec![follow("2"), follow("3")];

        let users = reconcile(&retweets, &replies, &follows);
        assert_eq!(users.len(), 3);

        let winners = qualified(&users);
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].account_id, AccountId::new("2"));
    }

    #[test]
    fn test_per_type_counts() {
        let retweets = vec![retweet("100", "1"), retweet("101", "1"), retweet("102", "2")];
        let replies = vec![reply("200", "1"), reply("201", "1"), reply("202", "1")];
        let follows = vec![follow("1"), follow("3")];

        let users = reconcile(&retweets, &replies, &follows);
        assert_eq!(users.len(), 3);

        let one = &users[&AccountId::new("1")];
        assert_eq!(
            (one.retweets.len(), one.replies.len(), one.follows.len()),
            (2, 3, 1)
        );
        let two = &users[&AccountId::new("2")];
        assert_eq!(
            (two.retweets.len(), two.replies.len(), two.follows.len()),
            (1, 0, 0)
        );
        let three = &users[&AccountId::new("3")];
        assert_eq!(
            (three.retweets.len(), three.replies.len(), three.follows.len()),
            (0, 0, 1)
        );
    }

    #[test]
    fn test_fold_order_does_not_matter() {
        let retweets = vec![retweet("100", "5"), retweet("101", "4")];
        let replies = vec![reply("200", "4"), reply("201", "6")];
        let follows = vec![follow("6"), follow("4"), follow("5")];

        let forward = reconcile(&retweets, &replies, &follows);

        // Feeding every event through a single slot folds them in a different order.
        let mut all: Vec<EngagementEvent> = follows
            .iter()
            .chain(&replies)
            .chain(&retweets)
            .cloned()
            .collect();
        all.reverse();
        let shuffled = reconcile(&[], &all, &[]);

        assert_eq!(forward, shuffled);
        assert_eq!(qualified(&forward), qualified(&shuffled));
    }

    #[test]
    fn test_qualified_is_reproducible() {
        let retweets = vec![retweet("1", "30"), retweet("2", "10"), retweet("3", "20")];
        let replies = vec![reply("4", "20"), reply("5", "30"), reply("6", "10")];
        let follows = vec![follow("10"), follow("30"), follow("20")];

        let users = reconcile(&retweets, &replies, &follows);
        let ids: Vec<String> = qualified(&users)
            .iter()
            .map(|r| r.account_id.to_string())
            .collect();
        assert_eq!(ids, vec!["10", "20", "30"]);
    }

    #[test]
    fn test_empty_inputs() {
        let users = reconcile(&[], &[], &[]);
        assert!(users.is_empty());
        assert!(qualified(&users).is_empty());
    }
}
