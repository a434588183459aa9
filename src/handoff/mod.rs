//! Passing one selected article from the feed to the detail page.
//!
//! The article is kept verbatim in a session slot; the detail URL only carries a cosmetic
//! slug and is never resolved back to an article.

mod slug;

pub use slug::slugify;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Article;
use crate::session::SessionStore;

/// Session slot holding the JSON of the selected article.
pub const CURRENT_ARTICLE_KEY: &str = "currentArticle";

pub const ARTICLE_NOT_FOUND: &str = "Article not found. Please return to the homepage.";
pub const ARTICLE_CORRUPTED: &str = "Failed to load article. Data might be corrupted.";

/// Store the article for the detail page and return the path to navigate to.
pub async fn select_article(
    sessions: &SessionStore,
    session: Uuid,
    article: &Article,
) -> Result<String, AppError> {
    let json = serde_json::to_string(article)?;
    sessions.set_slot(session, CURRENT_ARTICLE_KEY, json).await;
    Ok(detail_path(&article.title))
}

/// Read back the article stored by [`select_article`].
pub async fn load_selected(sessions: &SessionStore, session: Uuid) -> Result<Article, AppError> {
    let raw = sessions
        .slot(session, CURRENT_ARTICLE_KEY)
        .await
        .ok_or_else(|| AppError::NotFound(ARTICLE_NOT_FOUND.to_string()))?;

    serde_json::from_str(&raw).map_err(|e| {
        tracing::error!("Stored article unreadable: {}", e);
        AppError::Corrupted(ARTICLE_CORRUPTED.to_string())
    })
}

pub fn detail_path(title: &str) -> String {
    format!("/posts/{}", slugify(title))
}
