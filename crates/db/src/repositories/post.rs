//! Post repository.

use std::sync::Arc;

use petbook_common::{AppError, AppResult};
use serde_json::Value;

use crate::documents::Post;
use crate::paths;
use crate::repositories::decode;
use crate::store::{Direction, DocumentStore, Query, QueryCursor, WriteBatch};

/// Post repository for document operations.
#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn DocumentStore>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a post by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Post>> {
        match self.store.get(&paths::post(id)).await? {
            Some(value) => Ok(Some(decode(value)?)),
            None => Ok(None),
        }
    }

    /// Find a post by id, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Post> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Persist a new post.
    pub async fn create(&self, post: &Post) -> AppResult<()> {
        self.store
            .create(&paths::post(&post.id), serde_json::to_value(post)?)
            .await
    }

    /// List posts newest first, resuming strictly after `cursor`.
    pub async fn list(
        &self,
        cursor: Option<QueryCursor>,
        page_size: usize,
    ) -> AppResult<Vec<Post>> {
        let snapshots = self
            .store
            .query(
                Query::collection(paths::POSTS)
                    .order_by("createdAt", Direction::Desc)
                    .start_after(cursor)
                    .limit(page_size),
            )
            .await?;

        snapshots
            .into_iter()
            .map(|snap| decode(snap.data))
            .collect()
    }

    /// Add an account to a post's like set (no-op if already present).
    pub async fn add_like(&self, post_id: &str, account_id: &str) -> AppResult<()> {
        self.store
            .apply_batch(WriteBatch::new().array_union(
                paths::post(post_id),
                "likes",
                Value::from(account_id),
            ))
            .await
    }

    /// Remove an account from a post's like set.
    pub async fn remove_like(&self, post_id: &str, account_id: &str) -> AppResult<()> {
        self.store
            .apply_batch(WriteBatch::new().array_remove(
                paths::post(post_id),
                "likes",
                Value::from(account_id),
            ))
            .await
    }

    /// Delete a post document.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(&paths::post(id)).await
    }
}
