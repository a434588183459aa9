//! Headline feed page and the article selection that leads to the detail page.

use askama::Template;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::render;
use crate::errors::AppError;
use crate::feed::FeedState;
use crate::handoff;
use crate::models::Article;
use crate::session::{self, Toast};
use crate::AppState;

/// One headline card; `payload` is the article JSON posted back on selection.
pub struct ArticleCard {
    pub title: String,
    pub teaser: String,
    pub image: Option<String>,
    pub source: String,
    pub payload: String,
}

impl ArticleCard {
    fn new(article: &Article) -> Result<Self, AppError> {
        Ok(Self {
            title: article.title.clone(),
            teaser: article.teaser(),
            image: article.image.clone(),
            source: article.source.clone().unwrap_or_default(),
            payload: serde_json::to_string(article)?,
        })
    }
}

#[derive(Template)]
#[template(path = "feed.html")]
pub struct FeedTemplate {
    pub toasts: Vec<Toast>,
    pub error: Option<String>,
    pub cards: Vec<ArticleCard>,
}

impl FeedTemplate {
    pub fn new(feed: &FeedState, toasts: Vec<Toast>) -> Result<Self, AppError> {
        let cards = match feed {
            FeedState::Loaded(articles) => articles
                .iter()
                .map(ArticleCard::new)
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };
        Ok(Self {
            toasts,
            error: feed.error_message().map(str::to_string),
            cards,
        })
    }
}

/// GET / - Today's headlines.
pub async fn feed_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, session) = session::resolve(jar);
    let toasts = state.sessions.take_toasts(session).await;

    let feed = state.feed.fetch().await;
    let page = render(&FeedTemplate::new(&feed, toasts)?)?;
    Ok((jar, page))
}

#[derive(Debug, Deserialize)]
pub struct SelectArticleForm {
    pub article: String,
}

/// POST /articles/select - Hand the chosen article to the detail page.
pub async fn select_article(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SelectArticleForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let (jar, session) = session::resolve(jar);

    let article: Article = match serde_json::from_str(&form.article) {
        Ok(article) => article,
        Err(e) => {
            tracing::warn!("Rejected article selection: {}", e);
            state
                .sessions
                .push_toast(session, Toast::error("That article could not be opened."))
                .await;
            return Ok((jar, Redirect::to("/")));
        }
    };

    let path = handoff::select_article(&state.sessions, session, &article).await?;
    tracing::debug!(%path, "Article selected");
    Ok((jar, Redirect::to(&path)))
}
