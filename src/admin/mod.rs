//! Admin form state machine.
//!
//! The draft is in create mode while no id is staged and in edit mode once a post has been
//! selected. Submitting resets the draft to create mode before the remote call resolves.

use crate::errors::AppError;
use crate::models::{Post, PostId};
use crate::posts::PostsStore;
use crate::session::Toast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Not-yet-submitted form contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub id: Option<PostId>,
}

impl PostDraft {
    pub fn mode(&self) -> FormMode {
        match self.id {
            Some(_) => FormMode::Edit,
            None => FormMode::Create,
        }
    }

    /// Stage an existing post for editing.
    pub fn begin_edit(&mut self, post: &Post) {
        self.title = post.title.clone();
        self.body = post.body.clone();
        self.id = Some(post.id.clone());
    }

    /// Back to an empty create-mode form.
    pub fn reset(&mut self) {
        *self = PostDraft::default();
    }

    /// Turn the submitted fields into a store call and reset the draft.
    ///
    /// Blank fields are rejected and leave the draft as it was.
    pub fn submit(&mut self, title: &str, body: &str) -> Result<Submission, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::BadRequest("Title is required".to_string()));
        }
        if body.trim().is_empty() {
            return Err(AppError::BadRequest("Body is required".to_string()));
        }

        let staged = self.id.take();
        self.reset();

        let (title, body) = (title.to_string(), body.to_string());
        Ok(match staged {
            Some(id) => Submission::Update { id, title, body },
            None => Submission::Create { title, body },
        })
    }

    pub fn heading(&self) -> &'static str {
        match self.mode() {
            FormMode::Create => "Create a New Post",
            FormMode::Edit => "Edit Post",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode() {
            FormMode::Create => "Create Post",
            FormMode::Edit => "Update Post",
        }
    }
}

/// A store call produced by submitting the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create {
        title: String,
        body: String,
    },
    Update {
        id: PostId,
        title: String,
        body: String,
    },
}

impl Submission {
    /// Invoke the store and report the outcome as a toast.
    pub async fn dispatch(self, store: &PostsStore) -> Toast {
        match self {
            Submission::Create { title, body } => match store.create(&title, &body).await {
                Ok(_) => Toast::success("Post created successfully!"),
                Err(e) => {
                    tracing::warn!("Create failed: {}", e);
                    Toast::error("Failed to create post.")
                }
            },
            Submission::Update { id, title, body } => {
                match store.update(&id, &title, &body).await {
                    Ok(_) => Toast::success("Post updated successfully!"),
                    Err(e) => {
                        tracing::warn!(id = %id, "Update failed: {}", e);
                        Toast::error("Failed to update post.")
                    }
                }
            }
        }
    }
}

/// Delete a post after the user confirmed, reporting the outcome as a toast.
pub async fn confirmed_delete(store: &PostsStore, id: &PostId) -> Toast {
    match store.delete(id).await {
        Ok(()) => Toast::success("Post deleted successfully!"),
        Err(e) => {
            tracing::warn!(id = %id, "Delete failed: {}", e);
            Toast::error("Failed to delete post.")
        }
    }
}
