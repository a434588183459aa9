//! Client-visible posts collection with a shared request lifecycle status.
//!
//! Mutations complete independently and are applied in completion order. Only `list` touches
//! the status scalar.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::PostsBackend;
use crate::errors::AppError;
use crate::models::{Post, PostId, PostPayload};

/// Outcome of the most recent list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Consistent copy of the store contents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostsSnapshot {
    pub posts: Vec<Post>,
    pub status: LoadStatus,
    pub error: Option<String>,
}

#[derive(Default)]
struct PostsState {
    posts: Vec<Post>,
    status: LoadStatus,
    error: Option<String>,
    /// Bumped by every `list` call; a completion carrying an older value is stale.
    list_generation: u64,
}

/// The single authoritative in-memory posts collection.
pub struct PostsStore {
    backend: Arc<dyn PostsBackend>,
    state: RwLock<PostsState>,
}

impl PostsStore {
    pub fn new(backend: Arc<dyn PostsBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(PostsState::default()),
        }
    }

    /// Current posts, status and error.
    pub async fn snapshot(&self) -> PostsSnapshot {
        let state = self.state.read().await;
        PostsSnapshot {
            posts: state.posts.clone(),
            status: state.status,
            error: state.error.clone(),
        }
    }

    /// Find a stored post by the textual form of its id.
    pub async fn find(&self, raw_id: &str) -> Option<Post> {
        let state = self.state.read().await;
        state.posts.iter().find(|p| p.id.matches(raw_id)).cloned()
    }

    /// Fetch the whole collection from the service.
    ///
    /// On failure the previous collection is kept and the error is recorded. A completion that
    /// was overtaken by a later `list` call is discarded.
    pub async fn list(&self) -> Result<(), AppError> {
        let generation = {
            let mut state = self.state.write().await;
            state.list_generation += 1;
            state.status = LoadStatus::Loading;
            state.list_generation
        };

        let result = self.backend.list().await;

        let mut state = self.state.write().await;
        if state.list_generation != generation {
            tracing::debug!(generation, "Discarding superseded posts list");
            return result.map(|_| ());
        }

        match result {
            Ok(posts) => {
                tracing::debug!("Loaded {} posts", posts.len());
                state.posts = posts;
                state.status = LoadStatus::Succeeded;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to list posts: {}", e);
                state.status = LoadStatus::Failed;
                state.error = Some(e.message());
                Err(e)
            }
        }
    }

    /// Create a post and append the service's copy to the collection.
    pub async fn create(&self, title: &str, body: &str) -> Result<Post, AppError> {
        let payload = PostPayload {
            title: title.to_string(),
            body: body.to_string(),
        };
        let created = self.backend.create(&payload).await?;

        self.state.write().await.posts.push(created.clone());
        tracing::info!(id = %created.id, "Post created");
        Ok(created)
    }

    /// Replace title and body of a post.
    ///
    /// The stored entry matching the response's id is replaced in place; an unknown id leaves
    /// the collection untouched.
    pub async fn update(&self, id: &PostId, title: &str, body: &str) -> Result<Post, AppError> {
        let payload = PostPayload {
            title: title.to_string(),
            body: body.to_string(),
        };
        let updated = self.backend.update(id, &payload).await?;

        let mut state = self.state.write().await;
        match state.posts.iter_mut().find(|p| p.id == updated.id) {
            Some(slot) => *slot = updated.clone(),
            None => tracing::debug!(id = %updated.id, "Updated post not in collection"),
        }
        tracing::info!(id = %updated.id, "Post updated");
        Ok(updated)
    }

    /// Delete a post and drop every entry carrying its id.
    pub async fn delete(&self, id: &PostId) -> Result<(), AppError> {
        let deleted = self.backend.delete(id).await?;

        self.state.write().await.posts.retain(|p| p.id != deleted);
        tracing::info!(id = %deleted, "Post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use tokio::sync::Notify;

    /// Backend answering from a script of queued list results.
    #[derive(Default)]
    struct ScriptedBackend {
        lists: Mutex<VecDeque<Result<Vec<Post>, AppError>>>,
        next_id: Mutex<i64>,
        fail_mutations: bool,
        /// When set, the first list call waits for this before answering.
        gate: Option<Arc<Notify>>,
        gated: Mutex<bool>,
    }

    impl ScriptedBackend {
        fn with_lists(lists: Vec<Result<Vec<Post>, AppError>>) -> Self {
            Self {
                lists: Mutex::new(lists.into()),
                next_id: Mutex::new(100),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail_mutations: true,
                ..Self::with_lists(vec![Ok(seed())])
            }
        }

        fn mutation_error(&self) -> Result<(), AppError> {
            if self.fail_mutations {
                return Err(AppError::Upstream {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PostsBackend for ScriptedBackend {
        async fn list(&self) -> Result<Vec<Post>, AppError> {
            let result = self
                .lists
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()));
            let wait = {
                let mut gated = self.gated.lock().unwrap();
                let first = !*gated;
                *gated = true;
                first
            };
            if let (true, Some(gate)) = (wait, &self.gate) {
                gate.notified().await;
            }
            result
        }

        async fn create(&self, payload: &PostPayload) -> Result<Post, AppError> {
            self.mutation_error()?;
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            Ok(Post {
                id: PostId::Number(*next),
                title: payload.title.clone(),
                body: payload.body.clone(),
            })
        }

        async fn update(&self, id: &PostId, payload: &PostPayload) -> Result<Post, AppError> {
            self.mutation_error()?;
            Ok(Post {
                id: id.clone(),
                title: payload.title.clone(),
                body: payload.body.clone(),
            })
        }

        async fn delete(&self, id: &PostId) -> Result<PostId, AppError> {
            self.mutation_error()?;
            Ok(id.clone())
        }
    }

    fn post(id: i64, title: &str) -> Post {
        Post {
            id: PostId::Number(id),
            title: title.to_string(),
            body: format!("{} body", title),
        }
    }

    fn seed() -> Vec<Post> {
        vec![post(1, "first"), post(2, "second"), post(3, "third")]
    }

    async fn loaded_store() -> PostsStore {
        let store = PostsStore::new(Arc::new(ScriptedBackend::with_lists(vec![Ok(seed())])));
        store.list().await.unwrap();
        store
    }

    fn ids(snapshot: &PostsSnapshot) -> Vec<String> {
        snapshot.posts.iter().map(|p| p.id.to_string()).collect()
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let store = PostsStore::new(Arc::new(ScriptedBackend::default()));
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Idle);
        assert!(snapshot.posts.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_list_replaces_collection_in_service_order() {
        let store = loaded_store().await;
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Succeeded);
        assert_eq!(ids(&snapshot), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_failed_list_keeps_previous_posts() {
        let backend = ScriptedBackend::with_lists(vec![
            Ok(seed()),
            Err(AppError::Transport("Network error: refused".to_string())),
        ]);
        let store = PostsStore::new(Arc::new(backend));
        store.list().await.unwrap();

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("Network error: refused"));
        assert_eq!(ids(&snapshot), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_create_appends_once_with_service_id() {
        let store = loaded_store().await;
        let created = store.create("fourth", "fourth body").await.unwrap();
        assert_eq!(created.id, PostId::Number(101));

        let snapshot = store.snapshot().await;
        assert_eq!(ids(&snapshot), vec!["1", "2", "3", "101"]);
        assert_eq!(
            snapshot.posts.iter().filter(|p| p.id == created.id).count(),
            1
        );
        assert_eq!(snapshot.status, LoadStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let store = loaded_store().await;
        store
            .update(&PostId::Number(2), "renamed", "new body")
            .await
            .unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.posts.len(), 3);
        assert_eq!(snapshot.posts[1].title, "renamed");
        assert_eq!(snapshot.posts[1].body, "new body");
        assert_eq!(snapshot.posts[0], post(1, "first"));
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_does_not_insert() {
        let store = loaded_store().await;
        let before = store.snapshot().await.posts;

        store
            .update(&PostId::Number(99), "ghost", "ghost")
            .await
            .unwrap();

        assert_eq!(store.snapshot().await.posts, before);
    }

    #[tokio::test]
    async fn test_delete_removes_id_and_keeps_order() {
        let store = loaded_store().await;
        store.delete(&PostId::Number(2)).await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(ids(&snapshot), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_delete_removes_every_duplicate() {
        let listed = vec![post(1, "first"), post(2, "a"), post(3, "third"), post(2, "b")];
        let store = PostsStore::new(Arc::new(ScriptedBackend::with_lists(vec![Ok(listed)])));
        store.list().await.unwrap();

        store.delete(&PostId::Number(2)).await.unwrap();
        assert_eq!(ids(&store.snapshot().await), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_failed_mutations_leave_state_untouched() {
        let store = PostsStore::new(Arc::new(ScriptedBackend::failing()));
        store.list().await.unwrap();
        let before = store.snapshot().await;

        assert!(store.create("x", "y").await.is_err());
        assert!(store.update(&PostId::Number(1), "x", "y").await.is_err());
        assert!(store.delete(&PostId::Number(1)).await.is_err());

        let after = store.snapshot().await;
        assert_eq!(after.posts, before.posts);
        assert_eq!(after.status, LoadStatus::Succeeded);
        assert!(after.error.is_none());
    }

    #[tokio::test]
    async fn test_mutations_do_not_reset_failed_status() {
        let backend = ScriptedBackend::with_lists(vec![Err(AppError::Transport(
            "down".to_string(),
        ))]);
        let store = PostsStore::new(Arc::new(backend));
        let _ = store.list().await;

        store.create("kept", "status").await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("down"));
        assert_eq!(snapshot.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_superseded_list_is_discarded() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend {
            gate: Some(gate.clone()),
            ..ScriptedBackend::with_lists(vec![
                Ok(vec![post(1, "stale")]),
                Ok(vec![post(2, "fresh")]),
            ])
        });
        let store = Arc::new(PostsStore::new(backend.clone()));

        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.list().await })
        };
        // Wait until the first call holds its response.
        while !*backend.gated.lock().unwrap() {
            tokio::task::yield_now().await;
        }

        store.list().await.unwrap();
        gate.notify_one();
        slow.await.unwrap().unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Succeeded);
        assert_eq!(ids(&snapshot), vec!["2"]);
    }
}
