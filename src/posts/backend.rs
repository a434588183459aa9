//! Remote posts service access.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::models::{Post, PostId, PostPayload};

/// Operations offered by the remote posts resource.
#[async_trait]
pub trait PostsBackend: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, AppError>;
    async fn create(&self, payload: &PostPayload) -> Result<Post, AppError>;
    async fn update(&self, id: &PostId, payload: &PostPayload) -> Result<Post, AppError>;
    /// Returns the id that was deleted.
    async fn delete(&self, id: &PostId) -> Result<PostId, AppError>;
}

/// REST implementation over a base collection URL.
#[derive(Clone)]
pub struct HttpPostsBackend {
    http: Client,
    base_url: String,
}

impl HttpPostsBackend {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn item_url(&self, id: &PostId) -> String {
        format!("{}/{}", self.base_url, id.path_segment())
    }
}

#[async_trait]
impl PostsBackend for HttpPostsBackend {
    async fn list(&self) -> Result<Vec<Post>, AppError> {
        let resp = self.http.get(&self.base_url).send().await?;
        decode(resp).await
    }

    async fn create(&self, payload: &PostPayload) -> Result<Post, AppError> {
        let resp = self.http.post(&self.base_url).json(payload).send().await?;
        decode(resp).await
    }

    async fn update(&self, id: &PostId, payload: &PostPayload) -> Result<Post, AppError> {
        let resp = self.http.put(self.item_url(id)).json(payload).send().await?;
        decode(resp).await
    }

    async fn delete(&self, id: &PostId) -> Result<PostId, AppError> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await?;
            return Err(AppError::upstream(status, &body));
        }
        Ok(id.clone())
    }
}

/// Check the status and parse a JSON body.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, AppError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        return Err(AppError::upstream(status, &body));
    }
    serde_json::from_slice(&body).map_err(|e| AppError::Upstream {
        status: reqwest::StatusCode::BAD_GATEWAY,
        message: format!("Invalid response from posts service: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_url_escapes_id() {
        let backend = HttpPostsBackend::new(Client::new(), "http://localhost:4000/admin/posts/");
        assert_eq!(
            backend.item_url(&PostId::Number(7)),
            "http://localhost:4000/admin/posts/7"
        );
        assert_eq!(
            backend.item_url(&PostId::Text("a/b?c".to_string())),
            "http://localhost:4000/admin/posts/a%2Fb%3Fc"
        );
    }
}
