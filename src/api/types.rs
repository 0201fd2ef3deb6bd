use super::RawResponse;
use crate::error::{GiveawayError, Result};
use crate::model::{AccountId, AccountRef, PostId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

/// One page of a v2 list endpoint: `{data, includes, meta}` or `{errors}`.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub errors: Vec<ApiErrorBody>,
}

impl<T> Page<T> {
    /// A missing `data` field means the call matched nothing.
    pub fn items(&self) -> &[T] {
        self.data.as_deref().unwrap_or_default()
    }

    pub fn into_items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }

    pub fn next_token(&self) -> Option<&str> {
        self.meta.next_token.as_deref()
    }
}

/// Single-object lookup such as user-by-username.
#[derive(Debug, Deserialize)]
pub struct Lookup<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<ApiUser>,
}

impl Includes {
    /// Side-loaded authors keyed by id.
    pub fn users_by_id(&self) -> HashMap<&str, &ApiUser> {
        self.users.iter().map(|u| (u.id.as_str(), u)).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl ApiUser {
    pub fn to_account(&self) -> AccountRef {
        AccountRef {
            id: AccountId::new(self.id.clone()),
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPost {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    #[serde(default)]
    pub referenced_tweets: Vec<ReferencedPost>,
}

impl ApiPost {
    pub fn references(&self, target: &PostId) -> bool {
        self.referenced_tweets
            .iter()
            .any(|r| r.id == target.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferencedPost {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub detail: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ApiErrorBody {
    pub fn describe(&self) -> String {
        self.detail
            .as_deref()
            .or(self.message.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }

    pub fn is_not_found(&self) -> bool {
        self.title.as_deref() == Some("Not Found Error")
            || self
                .kind
                .as_deref()
                .is_some_and(|k| k.ends_with("resource-not-found"))
    }
}

/// Top-level problem body the platform sends with 4xx statuses.
#[derive(Debug, Default, Deserialize)]
struct Problem {
    detail: Option<String>,
    title: Option<String>,
}

fn problem_message(body: &str) -> String {
    serde_json::from_str::<Problem>(body)
        .ok()
        .and_then(|p| p.detail.or(p.title))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Map statuses that must abort the run regardless of body shape.
fn check_status(response: &RawResponse) -> Result<()> {
    match response.status {
        401 | 403 => Err(GiveawayError::Auth {
            message: problem_message(&response.body),
        }),
        429 => Err(GiveawayError::RateLimit),
        _ => Ok(()),
    }
}

fn decode_envelope<E: DeserializeOwned>(response: &RawResponse) -> Result<E> {
    check_status(response)?;
    match serde_json::from_str(&response.body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !response.is_success() => Err(GiveawayError::Api {
            status: response.status,
            message: problem_message(&response.body),
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn decode_page<T: DeserializeOwned>(response: &RawResponse) -> Result<Page<T>> {
    let page: Page<T> = decode_envelope(response)?;

    if let Some(error) = page.errors.first() {
        return Err(GiveawayError::Api {
            status: response.status,
            message: error.describe(),
        });
    }
    if !response.is_success() {
        return Err(GiveawayError::Api {
            status: response.status,
            message: problem_message(&response.body),
        });
    }

    Ok(page)
}

/// A failed status without an `errors` array is an outage, not a missing object.
pub fn decode_lookup<T: DeserializeOwned>(response: &RawResponse) -> Result<Lookup<T>> {
    let lookup: Lookup<T> = decode_envelope(response)?;

    if !response.is_success() && lookup.errors.is_empty() {
        return Err(GiveawayError::Api {
            status: response.status,
            message: problem_message(&response.body),
        });
    }

    Ok(lookup)
}
