//! Admin post manager pages.
//!
//! The form draft lives in the visitor's session; the collection lives in the shared
//! posts store. Mutations report back through toasts on the next page.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::render;
use crate::admin::{self, PostDraft};
use crate::errors::AppError;
use crate::models::{Post, PostId};
use crate::posts::{LoadStatus, PostsSnapshot};
use crate::session::{self, SessionData, Toast};
use crate::AppState;

/// Number of placeholder cards shown while the list loads.
const SKELETON_ROWS: usize = 3;

pub struct PostRow {
    pub title: String,
    pub body: String,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<&Post> for PostRow {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
            edit_href: format!("/admin/posts/{}/edit", post.id.path_segment()),
            delete_href: format!("/admin/posts/{}/delete", post.id.path_segment()),
        }
    }
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub toasts: Vec<Toast>,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub editing: bool,
    pub title: String,
    pub body: String,
    pub skeleton: Vec<usize>,
    pub error: Option<String>,
    pub posts: Option<Vec<PostRow>>,
}

impl AdminTemplate {
    pub fn new(draft: &PostDraft, snapshot: &PostsSnapshot, toasts: Vec<Toast>) -> Self {
        let skeleton = match snapshot.status {
            LoadStatus::Loading => (0..SKELETON_ROWS).collect(),
            _ => Vec::new(),
        };
        let error = match snapshot.status {
            LoadStatus::Failed => Some(snapshot.error.clone().unwrap_or_default()),
            _ => None,
        };
        let posts = match snapshot.status {
            LoadStatus::Succeeded => Some(snapshot.posts.iter().map(PostRow::from).collect()),
            _ => None,
        };

        Self {
            toasts,
            heading: draft.heading(),
            submit_label: draft.submit_label(),
            editing: draft.id.is_some(),
            title: draft.title.clone(),
            body: draft.body.clone(),
            skeleton,
            error,
            posts,
        }
    }
}

#[derive(Template)]
#[template(path = "admin_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub toasts: Vec<Toast>,
    pub title: String,
    pub action: String,
}

/// GET /admin - Post manager.
///
/// Opening the page loads the collection. Redirects back from an admin action keep the
/// in-memory list, so completed mutations show without another round trip.
pub async fn admin_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, session) = session::resolve(jar);

    let (draft, toasts, list_current) = state
        .sessions
        .with_existing(session, |s| {
            (s.draft.clone(), s.take_toasts(), s.take_list_current())
        })
        .await
        .unwrap_or_default();

    if !list_current || state.posts.snapshot().await.status == LoadStatus::Idle {
        // The failure is recorded in the store and rendered from the snapshot.
        let _ = state.posts.list().await;
    }
    let snapshot = state.posts.snapshot().await;

    let page = render(&AdminTemplate::new(&draft, &snapshot, toasts))?;
    Ok((jar, page))
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// POST /admin/posts - Create or update, depending on the draft's mode.
///
/// The draft is reset before the store call resolves.
pub async fn submit_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> (CookieJar, Redirect) {
    let (jar, session) = session::resolve(jar);

    let submission = state
        .sessions
        .with(session, |s| {
            s.keep_list();
            let result = s.draft.submit(&form.title, &form.body);
            if result.is_err() {
                s.draft.title = form.title.clone();
                s.draft.body = form.body.clone();
            }
            result
        })
        .await;

    let toast = match submission {
        Ok(submission) => submission.dispatch(&state.posts).await,
        Err(e) => Toast::error(e.message()),
    };
    state.sessions.push_toast(session, toast).await;

    (jar, Redirect::to("/admin"))
}

/// GET /admin/posts/{id}/edit - Switch the form to edit mode for a stored post.
pub async fn edit_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> (CookieJar, Redirect) {
    let (jar, session) = session::resolve(jar);

    let post = state.posts.find(&id).await;
    if post.is_none() {
        tracing::debug!(%id, "Edit requested for unknown post");
    }
    state
        .sessions
        .with(session, |s| {
            s.keep_list();
            match &post {
                Some(post) => s.draft.begin_edit(post),
                None => s.push_toast(Toast::error(format!("Post {} not found.", id))),
            }
        })
        .await;

    (jar, Redirect::to("/admin"))
}

/// POST /admin/cancel - Leave edit mode.
pub async fn cancel_edit(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, session) = session::resolve(jar);
    state
        .sessions
        .with(session, |s| {
            s.keep_list();
            s.draft.reset();
        })
        .await;
    (jar, Redirect::to("/admin"))
}

/// GET /admin/posts/{id}/delete - Ask before deleting.
pub async fn confirm_delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, session) = session::resolve(jar);
    let toasts = state.sessions.take_toasts(session).await;

    let found = state.posts.find(&id).await;
    let (title, post_id) = match found {
        Some(post) => (post.title, post.id),
        None => (format!("Post {}", id), PostId::Text(id)),
    };

    let page = render(&ConfirmDeleteTemplate {
        toasts,
        title,
        action: format!("/admin/posts/{}/delete", post_id.path_segment()),
    })?;
    Ok((jar, page))
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

/// POST /admin/posts/{id}/delete - Delete once the confirmation was given.
pub async fn delete_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> (CookieJar, Redirect) {
    let (jar, session) = session::resolve(jar);

    if form.confirm.as_deref() != Some("yes") {
        tracing::debug!(%id, "Delete not confirmed");
        state.sessions.with(session, SessionData::keep_list).await;
        return (jar, Redirect::to("/admin"));
    }

    // Unknown ids go out exactly as they arrived in the path.
    let found = state.posts.find(&id).await.map(|p| p.id);
    let post_id = found.unwrap_or(PostId::Text(id));
    let toast = admin::confirmed_delete(&state.posts, &post_id).await;
    state
        .sessions
        .with(session, |s| {
            s.keep_list();
            s.push_toast(toast);
        })
        .await;

    (jar, Redirect::to("/admin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: LoadStatus) -> PostsSnapshot {
        PostsSnapshot {
            posts: vec![Post {
                id: PostId::Number(1),
                title: "One".to_string(),
                body: "Body".to_string(),
            }],
            status,
            error: Some("Request failed with status code 500".to_string()),
        }
    }

    #[test]
    fn test_loading_shows_only_skeleton() {
        let view = AdminTemplate::new(&PostDraft::default(), &snapshot(LoadStatus::Loading), vec![]);
        assert_eq!(view.skeleton.len(), SKELETON_ROWS);
        assert!(view.error.is_none());
        assert!(view.posts.is_none());
    }

    #[test]
    fn test_failed_shows_stored_error() {
        let view = AdminTemplate::new(&PostDraft::default(), &snapshot(LoadStatus::Failed), vec![]);
        assert_eq!(
            view.error.as_deref(),
            Some("Request failed with status code 500")
        );
        assert!(view.posts.is_none());
        let html = view.render().unwrap();
        assert!(html.contains("Request failed with status code 500"));
    }

    #[test]
    fn test_succeeded_lists_posts_with_actions() {
        let view = AdminTemplate::new(
            &PostDraft::default(),
            &snapshot(LoadStatus::Succeeded),
            vec![],
        );
        let rows = view.posts.as_ref().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].edit_href, "/admin/posts/1/edit");
        assert_eq!(rows[0].delete_href, "/admin/posts/1/delete");
    }

    #[test]
    fn test_row_links_escape_text_ids() {
        let post = Post {
            id: PostId::Text("a/b?c".to_string()),
            title: "Odd".to_string(),
            body: "Body".to_string(),
        };
        let row = PostRow::from(&post);
        assert_eq!(row.edit_href, "/admin/posts/a%2Fb%3Fc/edit");
        assert_eq!(row.delete_href, "/admin/posts/a%2Fb%3Fc/delete");
    }

    #[test]
    fn test_idle_renders_nothing() {
        let view = AdminTemplate::new(&PostDraft::default(), &snapshot(LoadStatus::Idle), vec![]);
        assert!(view.skeleton.is_empty());
        assert!(view.error.is_none());
        assert!(view.posts.is_none());
    }

    #[test]
    fn test_edit_mode_form() {
        let mut draft = PostDraft::default();
        draft.begin_edit(&snapshot(LoadStatus::Succeeded).posts[0]);
        let view = AdminTemplate::new(&draft, &snapshot(LoadStatus::Succeeded), vec![]);
        assert!(view.editing);
        assert_eq!(view.heading, "Edit Post");
        let html = view.render().unwrap();
        assert!(html.contains("Update Post"));
        assert!(html.contains("/admin/cancel"));
    }
}
