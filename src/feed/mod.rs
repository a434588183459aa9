//! Headline feed: one-shot read from the aggregation API.
//!
//! No caching and no retries; every page view fetches afresh.

use reqwest::Client;
use serde_json::Value;

use crate::config::{Config, MEDIASTACK_KEY_PLACEHOLDER};
use crate::models::{Article, ArticleList};

/// Ordering requested from the aggregation service.
pub const FEED_SORT: &str = "published_desc";

/// Fallback shown when a failed request carries no service message.
pub const FEED_FETCH_FAILED: &str = "Failed to fetch news. Check your connection or API key.";

/// View state of the headline feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedState {
    /// Initial state before `fetch` resolves; pages await the fetch and never render it.
    #[default]
    Loading,
    /// Key missing or placeholder; no request was made
    ConfigError(String),
    /// Request failed
    Failed(String),
    /// Possibly empty
    Loaded(Vec<Article>),
}

impl FeedState {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FeedState::ConfigError(msg) | FeedState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Client for the aggregation service's list call.
#[derive(Clone)]
pub struct HeadlineFeed {
    http: Client,
    url: String,
    access_key: Option<String>,
    country: String,
    limit: u32,
}

impl HeadlineFeed {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            url: config.mediastack_url.clone(),
            access_key: config.usable_mediastack_key().map(str::to_string),
            country: config.feed_country.clone(),
            limit: config.feed_limit,
        }
    }

    /// Fetch the latest headlines.
    pub async fn fetch(&self) -> FeedState {
        let Some(key) = self.access_key.as_deref() else {
            tracing::warn!("Headline feed requested without an aggregation key");
            return FeedState::ConfigError(format!(
                "Please replace \"{}\" with your actual mediastack API key (NEWSDESK_MEDIASTACK_KEY).",
                MEDIASTACK_KEY_PLACEHOLDER
            ));
        };

        let limit = self.limit.to_string();
        let request = self.http.get(&self.url).query(&[
            ("access_key", key),
            ("countries", self.country.as_str()),
            ("limit", limit.as_str()),
            ("sort", FEED_SORT),
        ]);

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Headline request failed: {}", e);
                return FeedState::Failed(FEED_FETCH_FAILED.to_string());
            }
        };

        let status = resp.status();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Headline response unreadable: {}", e);
                return FeedState::Failed(FEED_FETCH_FAILED.to_string());
            }
        };

        if !status.is_success() {
            tracing::warn!(%status, "Aggregation service rejected headline request");
            let message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string));
            return match message {
                Some(message) => FeedState::Failed(format!("Error: {}", message)),
                None => FeedState::Failed(FEED_FETCH_FAILED.to_string()),
            };
        }

        match serde_json::from_slice::<ArticleList>(&body) {
            Ok(list) => {
                tracing::debug!("Fetched {} headlines", list.data.len());
                FeedState::Loaded(list.data)
            }
            Err(e) => {
                tracing::warn!("Headline response malformed: {}", e);
                FeedState::Failed(FEED_FETCH_FAILED.to_string())
            }
        }
    }
}
