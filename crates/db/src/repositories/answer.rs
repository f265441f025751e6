//! Answer repository.

use std::sync::Arc;

use petbook_common::{AppError, AppResult};
use serde_json::Value;

use crate::documents::Answer;
use crate::paths;
use crate::repositories::decode;
use crate::store::{Direction, DocumentStore, Filter, Query, WriteBatch};

/// Answer repository for document operations.
#[derive(Clone)]
pub struct AnswerRepository {
    store: Arc<dyn DocumentStore>,
}

impl AnswerRepository {
    /// Create a new answer repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find an answer by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Answer>> {
        match self.store.get(&paths::answer(id)).await? {
            Some(value) => Ok(Some(decode(value)?)),
            None => Ok(None),
        }
    }

    /// Find an answer by id, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Answer> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Answer not found: {id}")))
    }

    /// Persist a new answer and bump the parent question's `answerCount`.
    ///
    /// Both writes ride in one atomic batch so the count cannot drift from
    /// the actual number of answers, even under a crash between writes.
    pub async fn create_with_count(&self, answer: &Answer) -> AppResult<()> {
        let batch = WriteBatch::new()
            .create(paths::answer(&answer.id), serde_json::to_value(answer)?)
            .increment(paths::question(&answer.question_id), "answerCount", 1);

        self.store.apply_batch(batch).await
    }

    /// Answers of a question, oldest first (conversation order).
    pub async fn list_for_question(&self, question_id: &str) -> AppResult<Vec<Answer>> {
        let snapshots = self
            .store
            .query(
                Query::collection(paths::ANSWERS)
                    .filter(Filter::Eq(
                        "questionId".to_string(),
                        Value::from(question_id),
                    ))
                    .order_by("createdAt", Direction::Asc),
            )
            .await?;

        snapshots
            .into_iter()
            .map(|snap| decode(snap.data))
            .collect()
    }

    /// Add an account to an answer's upvote set (no-op if already present).
    pub async fn add_upvote(&self, answer_id: &str, account_id: &str) -> AppResult<()> {
        self.store
            .apply_batch(WriteBatch::new().array_union(
                paths::answer(answer_id),
                "upvotes",
                Value::from(account_id),
            ))
            .await
    }

    /// Remove an account from an answer's upvote set.
    pub async fn remove_upvote(&self, answer_id: &str, account_id: &str) -> AppResult<()> {
        self.store
            .apply_batch(WriteBatch::new().array_remove(
                paths::answer(answer_id),
                "upvotes",
                Value::from(account_id),
            ))
            .await
    }
}
