use crate::error::{GiveawayError, Result};
use crate::model::{format_api_time, AccountId, Handle, Hashtag, PostId, TimeWindow};
use reqwest::Url;

const SEARCH_PAGE_SIZE: u32 = 100;
const FOLLOWER_PAGE_SIZE: u32 = 1000;

const POST_FIELDS: &str = "id,text,author_id,referenced_tweets";
const USER_FIELDS: &str = "id,name,username";

/// Parameters for the recent-search endpoint. Built only through the typed constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    query: String,
    window: Option<TimeWindow>,
}

impl SearchQuery {
    /// Retweets of the host's posts inside the giveaway window.
    pub fn retweets_of(host: &Handle, window: TimeWindow) -> Self {
        Self {
            query: format!("retweets_of:{}", host),
            window: Some(window),
        }
    }

    /// Replies in the promotional post's thread carrying the hashtag.
    pub fn hashtag_replies(conversation: &PostId, hashtag: &Hashtag) -> Self {
        Self {
            query: format!("conversation_id:{} has:hashtags {}", conversation, hashtag),
            window: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    UserByUsername(Handle),
    SearchRecent(SearchQuery),
    Followers(AccountId),
}

impl Endpoint {
    /// Query parameter that carries the continuation cursor, if the endpoint pages.
    pub fn cursor_param(&self) -> Option<&'static str> {
        match self {
            Endpoint::UserByUsername(_) => None,
            Endpoint::SearchRecent(_) => Some("next_token"),
            Endpoint::Followers(_) => Some("pagination_token"),
        }
    }

    pub fn url(&self, base: &Url, cursor: Option<&str>) -> Result<Url> {
        let path = match self {
            Endpoint::UserByUsername(handle) => {
                format!("users/by/username/{}", urlencoding::encode(handle.as_str()))
            }
            Endpoint::SearchRecent(_) => "tweets/search/recent".to_string(),
            Endpoint::Followers(id) => {
                format!("users/{}/followers", urlencoding::encode(id.as_str()))
            }
        };

        let mut url = base.join(&path).map_err(|e| {
            GiveawayError::Config(format!("cannot build URL from base {}: {}", base, e))
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            match self {
                Endpoint::UserByUsername(_) => {
                    pairs.append_pair("user.fields", USER_FIELDS);
                }
                Endpoint::SearchRecent(search) => {
                    pairs.append_pair("query", &search.query);
                    if let Some(window) = &search.window {
                        pairs.append_pair("start_time", &format_api_time(window.start()));
                        pairs.append_pair("end_time", &format_api_time(window.end()));
                    }
                    pairs.append_pair("max_results", &SEARCH_PAGE_SIZE.to_string());
                    pairs.append_pair("expansions", "author_id");
                    pairs.append_pair("tweet.fields", POST_FIELDS);
                    pairs.append_pair("user.fields", USER_FIELDS);
                }
                Endpoint::Followers(_) => {
                    pairs.append_pair("max_results", &FOLLOWER_PAGE_SIZE.to_string());
                    pairs.append_pair("user.fields", USER_FIELDS);
                }
            }
            if let (Some(param), Some(token)) = (self.cursor_param(), cursor) {
                pairs.append_pair(param, token);
            }
        }

        Ok(url)
    }
}
