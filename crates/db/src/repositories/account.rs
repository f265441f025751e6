//! Account repository.

use std::sync::Arc;

use petbook_common::{AppError, AppResult};
use serde::Serialize;

use crate::documents::Account;
use crate::paths;
use crate::repositories::decode;
use crate::store::{Direction, DocumentStore, Filter, Query};

/// Mutable profile fields. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// New bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Account repository for document operations.
#[derive(Clone)]
pub struct AccountRepository {
    store: Arc<dyn DocumentStore>,
}

impl AccountRepository {
    /// Create a new account repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find an account by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        match self.store.get(&paths::account(id)).await? {
            Some(value) => Ok(Some(decode(value)?)),
            None => Ok(None),
        }
    }

    /// Find an account by id, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Account> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }

    /// Create an account. Fails with `Conflict` if the id is already taken.
    pub async fn create(&self, account: &Account) -> AppResult<()> {
        self.store
            .create(&paths::account(&account.id), serde_json::to_value(account)?)
            .await
    }

    /// Merge profile field updates into an account.
    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> AppResult<()> {
        self.store
            .set(&paths::account(id), serde_json::to_value(update)?, true)
            .await
    }

    /// List onboarded accounts (those with a claimed username) in username order.
    pub async fn list_onboarded(&self, limit: usize) -> AppResult<Vec<Account>> {
        let snapshots = self
            .store
            .query(
                Query::collection(paths::USERS)
                    .filter(Filter::Exists("username".to_string()))
                    .order_by("username", Direction::Asc)
                    .limit(limit),
            )
            .await?;

        snapshots
            .into_iter()
            .map(|snap| decode(snap.data))
            .collect()
    }

    /// Search onboarded accounts by username prefix.
    pub async fn search_by_username_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> AppResult<Vec<Account>> {
        let normalized = prefix.to_lowercase().trim().to_string();
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        // Half-open range [prefix, prefix-with-last-char-bumped).
        let Some(last) = normalized.chars().last() else {
            return Ok(Vec::new());
        };
        let Some(bumped) = char::from_u32(last as u32 + 1) else {
            return Ok(Vec::new());
        };
        let mut upper = normalized.clone();
        upper.pop();
        upper.push(bumped);

        let snapshots = self
            .store
            .query(
                Query::collection(paths::USERS)
                    .filter(Filter::Gte("username".to_string(), normalized.into()))
                    .filter(Filter::Lt("username".to_string(), upper.into()))
                    .order_by("username", Direction::Asc)
                    .limit(limit),
            )
            .await?;

        snapshots
            .into_iter()
            .map(|snap| decode(snap.data))
            .collect()
    }
}
