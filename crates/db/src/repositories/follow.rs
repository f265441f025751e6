//! Follow edge repository.

use std::sync::Arc;

use chrono::Utc;
use petbook_common::AppResult;

use crate::documents::FollowEdge;
use crate::paths;
use crate::repositories::decode;
use crate::store::{Direction, DocumentStore, Query, WriteBatch};

/// Follow repository for document operations.
///
/// Every mutation touches four documents (both edge copies and both
/// denormalized counters) in one atomic batch; a partially applied follow is
/// a correctness bug, not a degraded state.
#[derive(Clone)]
pub struct FollowRepository {
    store: Arc<dyn DocumentStore>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Check whether `actor` follows `target`.
    pub async fn is_following(&self, actor_id: &str, target_id: &str) -> AppResult<bool> {
        Ok(self
            .store
            .get(&paths::following_edge(actor_id, target_id))
            .await?
            .is_some())
    }

    /// Insert both edge copies and bump both counters atomically.
    ///
    /// The edges are create-if-absent writes: a duplicate follow fails the
    /// whole batch with `Conflict` before any counter moves, so two racing
    /// follows commit exactly one increment between them.
    pub async fn follow(&self, actor_id: &str, target_id: &str) -> AppResult<()> {
        let edge = serde_json::to_value(FollowEdge {
            followed_at: Utc::now(),
        })?;

        let batch = WriteBatch::new()
            .create(paths::following_edge(actor_id, target_id), edge.clone())
            .create(paths::follower_edge(target_id, actor_id), edge)
            .increment(paths::account(actor_id), "followingCount", 1)
            .increment(paths::account(target_id), "followersCount", 1);

        self.store.apply_batch(batch).await
    }

    /// Remove both edge copies and decrement both counters atomically.
    ///
    /// Callers must have verified the edge exists; issuing this for a
    /// non-followed target would drive the counters negative.
    pub async fn unfollow(&self, actor_id: &str, target_id: &str) -> AppResult<()> {
        let batch = WriteBatch::new()
            .delete(paths::following_edge(actor_id, target_id))
            .delete(paths::follower_edge(target_id, actor_id))
            .increment(paths::account(actor_id), "followingCount", -1)
            .increment(paths::account(target_id), "followersCount", -1);

        self.store.apply_batch(batch).await
    }

    /// Accounts following `account_id`, most recent first.
    pub async fn list_followers(
        &self,
        account_id: &str,
        limit: usize,
    ) -> AppResult<Vec<(String, FollowEdge)>> {
        self.list_edges(paths::followers_collection(account_id), limit)
            .await
    }

    /// Accounts `account_id` follows, most recent first.
    pub async fn list_following(
        &self,
        account_id: &str,
        limit: usize,
    ) -> AppResult<Vec<(String, FollowEdge)>> {
        self.list_edges(paths::following_collection(account_id), limit)
            .await
    }

    async fn list_edges(
        &self,
        collection: String,
        limit: usize,
    ) -> AppResult<Vec<(String, FollowEdge)>> {
        let snapshots = self
            .store
            .query(
                Query::collection(collection)
                    .order_by("followedAt", Direction::Desc)
                    .limit(limit),
            )
            .await?;

        snapshots
            .into_iter()
            .map(|snap| Ok((snap.id, decode(snap.data)?)))
            .collect()
    }
}
