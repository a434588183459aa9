//! Article detail page.

use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};
use axum_extra::extract::CookieJar;

use super::render;
use crate::errors::AppError;
use crate::handoff;
use crate::models::Article;
use crate::session::{self, Toast};
use crate::AppState;

#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticleTemplate {
    pub toasts: Vec<Toast>,
    pub article: Article,
    pub published: Option<String>,
    pub source: String,
}

/// Terminal state when nothing usable was handed over.
#[derive(Template)]
#[template(path = "article_missing.html")]
pub struct ArticleMissingTemplate {
    pub toasts: Vec<Toast>,
}

/// GET /posts/{slug} - The article stored by the last selection.
///
/// The slug is ignored; the session slot is the only source.
pub async fn article_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Html<String>), AppError> {
    let (jar, session) = session::resolve(jar);
    let mut toasts = state.sessions.take_toasts(session).await;

    match handoff::load_selected(&state.sessions, session).await {
        Ok(article) => {
            let page = render(&ArticleTemplate {
                toasts,
                published: article.published_date(),
                source: article.source.clone().unwrap_or_default(),
                article,
            })?;
            Ok((StatusCode::OK, jar, page))
        }
        Err(e) => {
            toasts.push(Toast::error(e.message()));
            let page = render(&ArticleMissingTemplate { toasts })?;
            Ok((e.status_code(), jar, page))
        }
    }
}
