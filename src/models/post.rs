//! Post model matching the remote posts service.

use std::fmt;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote posts service.
///
/// Kept in the JSON form the service used so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl PostId {
    /// Whether this id renders as the given path segment.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            PostId::Number(n) => raw.parse::<i64>().is_ok_and(|r| r == *n),
            PostId::Text(s) => s == raw,
        }
    }

    /// The id escaped for use as a single URL path segment.
    pub fn path_segment(&self) -> String {
        match self {
            PostId::Number(n) => n.to_string(),
            PostId::Text(s) => utf8_percent_encode(s, NON_ALPHANUMERIC).to_string(),
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{}", n),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PostId {
    /// Interpret a path segment, preferring the numeric form.
    fn from(raw: &str) -> Self {
        raw.parse()
            .map(PostId::Number)
            .unwrap_or_else(|_| PostId::Text(raw.to_string()))
    }
}

/// A title/body record managed through the admin screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
}

/// Request body for creating or replacing a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub body: String,
}
