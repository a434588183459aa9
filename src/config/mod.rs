//! Configuration module for the newsdesk front-end.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

use crate::errors::AppError;

/// Key value shipped in sample configuration; treated the same as an unset key.
pub const MEDIASTACK_KEY_PLACEHOLDER: &str = "YOUR_MEDIASTACK_API_KEY";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base collection URL of the remote posts service
    pub posts_url: String,
    /// Access key for the aggregation news API
    pub mediastack_key: Option<String>,
    /// Endpoint of the aggregation news API
    pub mediastack_url: String,
    /// Server-held key for the headline proxy provider
    pub newsapi_key: Option<String>,
    /// Endpoint of the headline proxy provider
    pub newsapi_url: String,
    /// Region filter sent with every headline request
    pub feed_country: String,
    /// Page size of the headline feed
    pub feed_limit: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("NEWSDESK_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid NEWSDESK_BIND_ADDR: {}", e)))?;

        let log_level = env::var("NEWSDESK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let posts_url = env::var("NEWSDESK_POSTS_URL")
            .unwrap_or_else(|_| "http://localhost:4000/admin/posts".to_string());

        let mediastack_key = non_empty(env::var("NEWSDESK_MEDIASTACK_KEY").ok());
        let mediastack_url = env::var("NEWSDESK_MEDIASTACK_URL")
            .unwrap_or_else(|_| "https://api.mediastack.com/v1/news".to_string());

        let newsapi_key = non_empty(env::var("NEWSDESK_NEWSAPI_KEY").ok());
        let newsapi_url = env::var("NEWSDESK_NEWSAPI_URL")
            .unwrap_or_else(|_| "https://newsapi.org/v2/top-headlines".to_string());

        let feed_country = env::var("NEWSDESK_FEED_COUNTRY").unwrap_or_else(|_| "in".to_string());
        let feed_limit = env::var("NEWSDESK_FEED_LIMIT")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid NEWSDESK_FEED_LIMIT: {}", e)))?;

        Ok(Self {
            bind_addr,
            log_level,
            posts_url: posts_url.trim_end_matches('/').to_string(),
            mediastack_key,
            mediastack_url,
            newsapi_key,
            newsapi_url,
            feed_country,
            feed_limit,
        })
    }

    /// The aggregation key, unless it is missing or still the placeholder.
    pub fn usable_mediastack_key(&self) -> Option<&str> {
        self.mediastack_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && *key != MEDIASTACK_KEY_PLACEHOLDER)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
