//! Article model matching the aggregation service's news records.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// A read-only news item from the aggregation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Article {
    /// Publication date for display, e.g. `1 Jan 2024`.
    ///
    /// Falls back to the raw value when it is neither RFC 3339 nor a plain date.
    pub fn published_date(&self) -> Option<String> {
        let raw = self.published_at.as_deref()?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.format("%-d %b %Y").to_string());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.format("%-d %b %Y").to_string());
        }
        Some(raw.to_string())
    }

    /// Feed card teaser: the first 100 characters of the description.
    pub fn teaser(&self) -> String {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => {
                let head: String = text.chars().take(100).collect();
                format!("{}...", head)
            }
            _ => "No description available.".to_string(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Successful response of the aggregation list call.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleList {
    #[serde(default)]
    pub data: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(published_at: Option<&str>, description: Option<&str>) -> Article {
        Article {
            title: "Headline".to_string(),
            description: description.map(str::to_string),
            image: None,
            source: Some("Wire".to_string()),
            published_at: published_at.map(str::to_string),
            url: None,
            author: None,
            category: None,
            language: None,
            country: None,
        }
    }

    #[test]
    fn test_published_date_formats() {
        assert_eq!(
            article(Some("2024-03-05T10:00:00+00:00"), None).published_date(),
            Some("5 Mar 2024".to_string())
        );
        assert_eq!(
            article(Some("2024-01-01"), None).published_date(),
            Some("1 Jan 2024".to_string())
        );
        assert_eq!(
            article(Some("yesterday"), None).published_date(),
            Some("yesterday".to_string())
        );
        assert_eq!(article(None, None).published_date(), None);
    }

    #[test]
    fn test_teaser_truncates_on_characters() {
        let long = "é".repeat(150);
        let teaser = article(None, Some(&long)).teaser();
        assert_eq!(teaser.chars().count(), 103);
        assert!(teaser.ends_with("..."));
        assert_eq!(article(None, None).teaser(), "No description available.");
    }

    #[test]
    fn test_list_tolerates_unknown_fields() {
        let list: ArticleList = serde_json::from_str(
            r#"{"pagination":{"limit":12},"data":[{"title":"A","source":"X","extra":1}]}"#,
        )
        .unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].source.as_deref(), Some("X"));
    }
}
