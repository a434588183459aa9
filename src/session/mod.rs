//! Per-visitor transient state keyed by a session cookie.
//!
//! Holds named string slots (the article handoff lives here), the admin form draft and pending
//! toasts. Nothing is persisted; a session ends when the browser drops its session cookie or
//! the entry is pruned after a long idle period.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::admin::PostDraft;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "newsdesk_session";

/// Severity of a one-shot notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

/// Notification shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            text: text.into(),
        }
    }
}

/// Everything remembered for one visitor.
#[derive(Debug, Clone)]
pub struct SessionData {
    slots: HashMap<String, String>,
    pub draft: PostDraft,
    toasts: Vec<Toast>,
    /// Set by admin actions that redirect back to an already-loaded list.
    list_current: bool,
    touched: Instant,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            draft: PostDraft::default(),
            toasts: Vec::new(),
            list_current: false,
            touched: Instant::now(),
        }
    }
}

impl SessionData {
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }

    /// Last write wins.
    pub fn set_slot(&mut self, key: &str, value: String) {
        self.slots.insert(key.to_string(), value);
    }

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// The next admin page view keeps the in-memory list instead of reloading it.
    pub fn keep_list(&mut self) {
        self.list_current = true;
    }

    /// Whether the list was marked current; clears the mark.
    pub fn take_list_current(&mut self) -> bool {
        std::mem::take(&mut self.list_current)
    }
}

/// In-memory session registry.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the session, creating it on first use.
    pub async fn with<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let data = sessions.entry(id).or_default();
        data.touched = Instant::now();
        f(data)
    }

    /// Run `f` against the session if it already exists. Never creates one.
    pub async fn with_existing<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionData) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let data = sessions.get_mut(&id)?;
        data.touched = Instant::now();
        Some(f(data))
    }

    /// Read a named slot.
    pub async fn slot(&self, id: Uuid, key: &str) -> Option<String> {
        self.with_existing(id, |s| s.slot(key).map(str::to_string))
            .await
            .flatten()
    }

    /// Overwrite a named slot.
    pub async fn set_slot(&self, id: Uuid, key: &str, value: String) {
        self.with(id, |s| s.set_slot(key, value)).await
    }

    pub async fn push_toast(&self, id: Uuid, toast: Toast) {
        self.with(id, |s| s.push_toast(toast)).await
    }

    /// Pending toasts; they are gone afterwards.
    pub async fn take_toasts(&self, id: Uuid) -> Vec<Toast> {
        self.with_existing(id, SessionData::take_toasts)
            .await
            .unwrap_or_default()
    }

    /// Drop sessions idle for longer than `max_idle`. Returns how many were removed.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| data.touched.elapsed() <= max_idle);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Session id from the request cookies, issuing a fresh cookie when absent or malformed.
pub fn resolve(jar: CookieJar) -> (CookieJar, Uuid) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        return (jar, id);
    }

    let id = Uuid::new_v4();
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), id)
}
