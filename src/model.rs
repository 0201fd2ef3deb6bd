use crate::error::{GiveawayError, Result};
use chrono::{DateTime, LocalResult, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

const POST_URL_BASE: &str = "https://twitter.com";

/// Numeric account identifier as issued by the platform. Stable across handle changes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account handle without the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle(String);

impl Handle {
    pub fn parse(raw: &str) -> Result<Self> {
        let handle = raw.trim().trim_start_matches('@');
        let valid_chars = handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if handle.is_empty() || handle.len() > 15 || !valid_chars {
            return Err(GiveawayError::Config(format!(
                "'{}' is not a valid account handle",
                raw
            )));
        }
        Ok(Self(handle.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hashtag without the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hashtag(String);

impl Hashtag {
    pub fn parse(raw: &str) -> Result<Self> {
        let tag = raw.trim().trim_start_matches('#');
        if tag.is_empty() || !tag.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(GiveawayError::Config(format!(
                "'{}' is not a valid hashtag",
                raw
            )));
        }
        Ok(Self(tag.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hashtag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An account as returned by the platform. Two refs are the same account iff their ids match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: AccountId,
    pub username: String,
    #[serde(rename = "displayname")]
    pub name: String,
}

impl PartialEq for AccountRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AccountRef {}

impl Hash for AccountRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A retweet or a reply, joined with its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostEvent {
    #[serde(rename = "tweet_id")]
    pub post_id: PostId,
    #[serde(rename = "tweet_text")]
    pub text: String,
    pub author: AccountRef,
    #[serde(rename = "tweet_url")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngagementEvent {
    Retweet(PostEvent),
    Reply(PostEvent),
    Follow { account: AccountRef },
}

impl EngagementEvent {
    pub fn account(&self) -> &AccountRef {
        match self {
            EngagementEvent::Retweet(post) | EngagementEvent::Reply(post) => &post.author,
            EngagementEvent::Follow { account } => account,
        }
    }
}

/// Everything one account did for the giveaway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEngagementRecord {
    pub account_id: AccountId,
    pub retweets: Vec<PostEvent>,
    #[serde(rename = "follow")]
    pub follows: Vec<AccountRef>,
    #[serde(rename = "comments")]
    pub replies: Vec<PostEvent>,
}

impl UserEngagementRecord {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            retweets: Vec::new(),
            follows: Vec::new(),
            replies: Vec::new(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        !self.retweets.is_empty() && !self.follows.is_empty() && !self.replies.is_empty()
    }

    /// Best known account metadata, preferring the follower listing since it is never stale.
    pub fn account(&self) -> Option<&AccountRef> {
        self.follows
            .first()
            .or_else(|| self.replies.first().map(|r| &r.author))
            .or_else(|| self.retweets.first().map(|r| &r.author))
    }
}

/// The drawn winner, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub name: String,
    pub username: String,
    pub comment_url: String,
    pub engagement: UserEngagementRecord,
}

impl WinnerRecord {
    pub fn from_record(record: UserEngagementRecord) -> Result<Self> {
        let account = record.account().cloned().ok_or_else(|| {
            GiveawayError::DataIntegrity(format!(
                "winner {} has no account metadata",
                record.account_id
            ))
        })?;
        let comment_url = record
            .replies
            .first()
            .map(|r| r.url.clone())
            .ok_or_else(|| {
                GiveawayError::DataIntegrity(format!(
                    "winner {} has no qualifying reply",
                    record.account_id
                ))
            })?;

        Ok(Self {
            name: account.name,
            username: account.username,
            comment_url,
            engagement: record,
        })
    }
}

/// Eligibility window, always held in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(GiveawayError::Config(format!(
                "giveaway start {} is after its end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Interpret both bounds as wall-clock times in `tz` and normalize to UTC.
    pub fn from_local(start: NaiveDateTime, end: NaiveDateTime, tz: Tz) -> Result<Self> {
        Self::new(local_to_utc(start, tz)?, local_to_utc(end, tz)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// RFC 3339 with a `Z` suffix, the form the search endpoint accepts.
pub fn format_api_time(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(_, _) => Err(GiveawayError::Config(format!(
            "{} is ambiguous in {} (daylight saving transition)",
            naive, tz
        ))),
        LocalResult::None => Err(GiveawayError::Config(format!(
            "{} does not exist in {} (daylight saving transition)",
            naive, tz
        ))),
    }
}

pub fn post_url(post_id: &PostId, account_id: &AccountId) -> String {
    format!("{}/{}/status/{}", POST_URL_BASE, account_id, post_id)
}
