//! Question repository.

use std::sync::Arc;

use petbook_common::{AppError, AppResult};
use serde_json::Value;

use crate::documents::Question;
use crate::paths;
use crate::repositories::decode;
use crate::store::{Direction, DocumentStore, Query, QueryCursor, WriteBatch};

/// Question repository for document operations.
#[derive(Clone)]
pub struct QuestionRepository {
    store: Arc<dyn DocumentStore>,
}

impl QuestionRepository {
    /// Create a new question repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a question by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        match self.store.get(&paths::question(id)).await? {
            Some(value) => Ok(Some(decode(value)?)),
            None => Ok(None),
        }
    }

    /// Find a question by id, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Question> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::QuestionNotFound(id.to_string()))
    }

    /// Persist a new question.
    pub async fn create(&self, question: &Question) -> AppResult<()> {
        self.store
            .create(
                &paths::question(&question.id),
                serde_json::to_value(question)?,
            )
            .await
    }

    /// List questions newest first, resuming strictly after `cursor`.
    pub async fn list(
        &self,
        cursor: Option<QueryCursor>,
        page_size: usize,
    ) -> AppResult<Vec<Question>> {
        let snapshots = self
            .store
            .query(
                Query::collection(paths::QUESTIONS)
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

    /// Add an account to a question's upvote set (no-op if already present).
    pub async fn add_upvote(&self, question_id: &str, account_id: &str) -> AppResult<()> {
        self.store
            .apply_batch(WriteBatch::new().array_union(
                paths::question(question_id),
                "upvotes",
                Value::from(account_id),
            ))
            .await
    }

    /// Remove an account from a question's upvote set.
    pub async fn remove_upvote(&self, question_id: &str, account_id: &str) -> AppResult<()> {
        self.store
            .apply_batch(WriteBatch::new().array_remove(
                paths::question(question_id),
                "upvotes",
                Value::from(account_id),
            ))
            .await
    }

    /// Delete a question document.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(&paths::question(id)).await
    }
}
