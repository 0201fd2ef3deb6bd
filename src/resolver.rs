use crate::api::types::decode_lookup;
use crate::api::{ApiUser, Endpoint, Transport};
use crate::error::{GiveawayError, Result};
use crate::model::{AccountRef, Handle, PostId};
use reqwest::Url;
use std::ops::RangeInclusive;

/// Length of post ids the platform issues today. Kept configurable since id formats evolve.
pub const DEFAULT_POST_ID_LEN: RangeInclusive<usize> = 18..=20;

/// Look up the account behind `handle`.
pub async fn resolve_account(
    transport: &dyn Transport,
    base: &Url,
    handle: &Handle,
) -> Result<AccountRef> {
    let url = Endpoint::UserByUsername(handle.clone()).url(base, None)?;
    let response = transport.get(&url).await?;
    let lookup = decode_lookup::<ApiUser>(&response)?;

    match (lookup.data, lookup.errors.first()) {
        (Some(user), _) => Ok(user.to_account()),
        (None, Some(error)) if !error.is_not_found() => Err(GiveawayError::Api {
            status: response.status,
            message: error.describe(),
        }),
        (None, _) => Err(GiveawayError::NotFound {
            handle: handle.to_string(),
        }),
    }
}

/// Extract the post id from a post URL such as `https://twitter.com/host/status/<id>`.
pub fn resolve_post_id(url: &str, id_len: &RangeInclusive<usize>) -> Result<PostId> {
    let invalid = |reason: String| GiveawayError::InvalidReference {
        reference: url.to_string(),
        reason,
    };

    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let candidate = path.rsplit('/').next().unwrap_or_default();

    if candidate.is_empty() || !candidate.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("'{}' is not a numeric post id", candidate)));
    }
    if !id_len.contains(&candidate.len()) {
        return Err(invalid(format!(
            "post id '{}' has {} digits, expected {} to {}",
            candidate,
            candidate.len(),
            id_len.start(),
            id_len.end()
        )));
    }

    Ok(PostId::new(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{user, ScriptedTransport};
    use crate::api::TWITTER_API_BASE;
    use crate::model::{post_url, AccountId};
    use serde_json::json;

    fn base() -> Url {
        Url::parse(TWITTER_API_BASE).unwrap()
    }

    #[test]
    fn test_resolve_post_id() {
        let id = resolve_post_id(
            "https://twitter.com/host/status/1410000000000000000",
            &DEFAULT_POST_ID_LEN,
        )
        .unwrap();
        assert_eq!(id.as_str(), "1410000000000000000");
    }

    #[test]
    fn test_resolve_post_id_trailing_slash_and_query() {
        let expected = PostId::new("1410000000000000000");
        for url in [
            "https://twitter.com/host/status/1410000000000000000/",
            "https://x.com/host/status/1410000000000000000?s=20",
            "https://twitter.com/host/status/1410000000000000000#top",
        ] {
            assert_eq!(resolve_post_id(url, &DEFAULT_POST_ID_LEN).unwrap(), expected);
        }
    }

    #[test]
    fn test_resolve_post_id_rejects_bad_input() {
        for url in [
            "https://twitter.com/host",
            "https://twitter.com/host/status/123",
            "https://twitter.com/host/status/123456789012345678901",
            "https://twitter.com/host/status/14100000000000000ab",
            "",
        ] {
            assert!(matches!(
                resolve_post_id(url, &DEFAULT_POST_ID_LEN),
                Err(GiveawayError::InvalidReference { .. })
            ));
        }
    }

    #[test]
    fn test_resolve_post_id_custom_bounds() {
        assert!(resolve_post_id("https://twitter.com/host/status/12345", &(3..=6)).is_ok());
    }

    #[test]
    fn test_post_url_round_trip() {
        let post = PostId::new("1410000000000000123");
        let url = post_url(&post, &AccountId::new("987654"));
        assert_eq!(resolve_post_id(&url, &DEFAULT_POST_ID_LEN).unwrap(), post);
    }

    #[tokio::test]
    async fn test_resolve_account() {
        let transport = ScriptedTransport::new().ok(json!({"data": user("42")}));
        let account = resolve_account(&transport, &base(), &Handle::parse("user42").unwrap())
            .await
            .unwrap();
        assert_eq!(account.id, AccountId::new("42"));
        assert_eq!(account.username, "user42");
        assert_eq!(account.name, "User 42");
        assert!(transport.requests()[0]
            .path()
            .ends_with("/users/by/username/user42"));
    }

    #[tokio::test]
    async fn test_resolve_account_not_found() {
        let transport = ScriptedTransport::new().ok(json!({"errors": [{
            "detail": "Could not find user with username: [ghost].",
            "title": "Not Found Error",
            "type": "https://api.twitter.com/2/problems/resource-not-found"
        }]}));
        let result = resolve_account(&transport, &base(), &Handle::parse("ghost").unwrap()).await;
        assert!(matches!(result, Err(GiveawayError::NotFound { handle }) if handle == "ghost"));
    }

    #[tokio::test]
    async fn test_resolve_account_auth_and_rate_limit() {
        let transport = ScriptedTransport::new()
            .push(401, json!({"title": "Unauthorized", "detail": "Unauthorized"}))
            .push(429, json!({"title": "Too Many Requests"}));
        let handle = Handle::parse("host").unwrap();

        let first = resolve_account(&transport, &base(), &handle).await;
        assert!(matches!(first, Err(GiveawayError::Auth { .. })));
        let second = resolve_account(&transport, &base(), &handle).await;
        assert!(matches!(second, Err(GiveawayError::RateLimit)));
    }

    #[tokio::test]
    async fn test_resolve_account_outage_is_not_not_found() {
        let transport = ScriptedTransport::new().push(
            503,
            json!({"title": "Service Unavailable", "detail": "Service Unavailable"}),
        );
        let result = resolve_account(&transport, &base(), &Handle::parse("host").unwrap()).await;
        assert!(matches!(result, Err(GiveawayError::Api { status: 503, .. })));
    }
}
