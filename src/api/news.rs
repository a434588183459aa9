//! Headline proxy endpoint.
//!
//! Forwards to the alternate headline provider with the server-held key so the key never
//! reaches the browser.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::{extract_message, AppError};
use crate::AppState;

pub const NEWS_KEY_MISSING: &str = "News API key not configured on the server.";
pub const NEWS_FETCH_FAILED: &str = "Failed to fetch data from the server.";

/// GET /api/news - Upstream top headlines, verbatim.
pub async fn proxy_headlines(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let Some(key) = state.config.newsapi_key.as_deref() else {
        tracing::error!("Headline proxy called without NEWSDESK_NEWSAPI_KEY");
        return Err(AppError::Config(NEWS_KEY_MISSING.to_string()));
    };

    let resp = state
        .http
        .get(&state.config.newsapi_url)
        .query(&[("country", state.config.feed_country.as_str()), ("apiKey", key)])
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Headline provider unreachable: {}", e);
            AppError::Internal(NEWS_FETCH_FAILED.to_string())
        })?;

    let status = resp.status();
    let body: Value = resp.json().await.map_err(|e| {
        tracing::error!(%status, "Headline provider sent an unreadable body: {}", e);
        AppError::Internal(NEWS_FETCH_FAILED.to_string())
    })?;

    if !status.is_success() {
        let message = extract_message(&body)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        tracing::warn!(%status, "Headline provider error: {}", message);
        return Err(AppError::Upstream {
            status,
            message: format!("News API Error: {}", message),
        });
    }

    Ok(Json(body))
}
