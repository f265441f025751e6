//! Comment repository.

use std::sync::Arc;

use petbook_common::AppResult;
use serde_json::Value;

use crate::documents::Comment;
use crate::paths;
use crate::repositories::decode;
use crate::store::{Direction, DocumentStore, Filter, Query};

/// Comment repository for document operations.
#[derive(Clone)]
pub struct CommentRepository {
    store: Arc<dyn DocumentStore>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a new comment.
    pub async fn create(&self, comment: &Comment) -> AppResult<()> {
        self.store
            .create(&paths::comment(&comment.id), serde_json::to_value(comment)?)
            .await
    }

    /// Comments of a post, oldest first.
    pub async fn list_for_post(&self, post_id: &str) -> AppResult<Vec<Comment>> {
        let snapshots = self
            .store
            .query(
                Query::collection(paths::COMMENTS)
                    .filter(Filter::Eq("postId".to_string(), Value::from(post_id)))
                    .order_by("createdAt", Direction::Asc),
            )
            .await?;

        snapshots
            .into_iter()
            .map(|snap| decode(snap.data))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn create_test_comment(id: &str, post_id: &str, minute: u32) -> Comment {
        Comment {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: "u1".to_string(),
            author_name: "Test User".to_string(),
            author_photo: None,
            content: format!("comment {id}"),
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, minute, 0)
                .single()
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_list_for_post_ascending() {
        let repo = CommentRepository::new(Arc::new(MemoryStore::new()));
        repo.create(&create_test_comment("c2", "p1", 2)).await.unwrap();
        repo.create(&create_test_comment("c1", "p1", 1)).await.unwrap();
        repo.create(&create_test_comment("c3", "p2", 3)).await.unwrap();

        let comments = repo.list_for_post("p1").await.unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }
}
