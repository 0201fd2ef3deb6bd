use super::{RawResponse, Transport};
use crate::error::{GiveawayError, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned responses in order and remembers every URL requested.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(self, status: u16, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(RawResponse {
                status,
                body: body.to_string(),
            });
        self
    }

    pub fn ok(self, body: Value) -> Self {
        self.push(200, body)
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(url.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GiveawayError::Network(format!("no scripted response for {}", url)))
    }
}

pub fn user(id: &str) -> Value {
    json!({"id": id, "name": format!("User {}", id), "username": format!("user{}", id)})
}

pub fn post(id: &str, author_id: &str, references: &[&str]) -> Value {
    let referenced: Vec<Value> = references
        .iter()
        .map(|r| json!({"type": "retweeted", "id": r}))
        .collect();
    json!({"id": id, "text": format!("post {}", id), "author_id": author_id, "referenced_tweets": referenced})
}

/// A search page whose authors are all side-loaded.
pub fn search_page(posts: Vec<Value>, users: Vec<Value>, next_token: Option<&str>) -> Value {
    let mut meta = json!({"result_count": posts.len()});
    if let Some(token) = next_token {
        meta["next_token"] = json!(token);
    }
    json!({"data": posts, "includes": {"users": users}, "meta": meta})
}

pub fn user_page(users: Vec<Value>, next_token: Option<&str>) -> Value {
    let mut meta = json!({"result_count": users.len()});
    if let Some(token) = next_token {
        meta["next_token"] = json!(token);
    }
    json!({"data": users, "meta": meta})
}
