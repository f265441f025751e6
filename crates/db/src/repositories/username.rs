//! Username reservation repository.

use std::sync::Arc;

use petbook_common::AppResult;
use serde_json::json;

use crate::documents::UsernameReservation;
use crate::paths;
use crate::repositories::decode;
use crate::store::{DocumentStore, WriteBatch};

/// Username reservation repository.
#[derive(Clone)]
pub struct UsernameRepository {
    store: Arc<dyn DocumentStore>,
}

impl UsernameRepository {
    /// Create a new username repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a reservation by normalized username.
    pub async fn find(&self, normalized: &str) -> AppResult<Option<UsernameReservation>> {
        match self.store.get(&paths::username(normalized)).await? {
            Some(value) => Ok(Some(decode(value)?)),
            None => Ok(None),
        }
    }

    /// Whether a normalized username is already reserved.
    pub async fn exists(&self, normalized: &str) -> AppResult<bool> {
        Ok(self.find(normalized).await?.is_some())
    }

    /// Atomically reserve a username and stamp it onto the account.
    ///
    /// The reservation is a create-if-absent write, so of two concurrent
    /// claims for the same name exactly one commits; the loser gets
    /// `Conflict`. The account update (username, bio, zeroed follow counters)
    /// rides in the same batch and cannot be observed without the reservation.
    pub async fn claim(&self, account_id: &str, normalized: &str, bio: &str) -> AppResult<()> {
        let batch = WriteBatch::new()
            .create(paths::username(normalized), json!({ "uid": account_id }))
            .set(
                paths::account(account_id),
                json!({
                    "username": normalized,
                    "bio": bio,
                    "followingCount": 0,
                    "followersCount": 0,
                }),
                true,
            );

        self.store.apply_batch(batch).await
    }
}
