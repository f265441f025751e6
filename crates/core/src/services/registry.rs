//! Username registry service.

use once_cell::sync::Lazy;
use petbook_common::{AppError, AppResult};
use petbook_db::documents::Account;
use petbook_db::repositories::{AccountRepository, UsernameRepository};
use regex::Regex;

/// Valid normalized usernames: lowercase alphanumerics and underscore, 3-20 chars.
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new("^[a-z0-9_]{3,20}$").unwrap()
});

/// Normalize a raw handle: trim whitespace and lowercase.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Username registry service.
///
/// Maps a unique normalized handle to an account id. Usernames are permanent:
/// once claimed they cannot be re-claimed, released, or transferred.
#[derive(Clone)]
pub struct UsernameRegistryService {
    username_repo: UsernameRepository,
    account_repo: AccountRepository,
}

impl UsernameRegistryService {
    /// Create a new registry service.
    #[must_use]
    pub const fn new(username_repo: UsernameRepository, account_repo: AccountRepository) -> Self {
        Self {
            username_repo,
            account_repo,
        }
    }

    /// Whether a handle is well-formed and unclaimed. Pure read.
    ///
    /// Malformed handles report unavailable rather than erroring, since the
    /// caller only wants a yes/no for onboarding UI.
    pub async fn is_available(&self, raw: &str) -> AppResult<bool> {
        let normalized = normalize_username(raw);
        if !USERNAME_RE.is_match(&normalized) {
            return Ok(false);
        }
        Ok(!self.username_repo.exists(&normalized).await?)
    }

    /// Claim a username for an account.
    ///
    /// Fails with `Validation` for a malformed handle and `Conflict` if the
    /// name is reserved by anyone, the claiming account included. The
    /// reservation and the account update commit atomically; concurrent
    /// claims for the same name have exactly one winner.
    pub async fn claim(&self, account_id: &str, raw: &str, bio: Option<&str>) -> AppResult<()> {
        let normalized = normalize_username(raw);
        if !USERNAME_RE.is_match(&normalized) {
            return Err(AppError::Validation(format!(
                "Invalid username: {normalized:?} (3-20 chars, a-z, 0-9, _)"
            )));
        }

        // The account must exist before it can be onboarded.
        let account = self.account_repo.get_by_id(account_id).await?;
        if account.is_onboarded() {
            return Err(AppError::Conflict(format!(
                "Account {account_id} already has a username"
            )));
        }

        self.username_repo
            .claim(account_id, &normalized, bio.unwrap_or_default())
            .await?;

        tracing::info!(account_id, username = %normalized, "Username claimed");
        Ok(())
    }

    /// Search onboarded accounts by username prefix.
    pub async fn search(&self, prefix: &str, limit: usize) -> AppResult<Vec<Account>> {
        self.account_repo
            .search_by_username_prefix(prefix, limit)
            .await
    }
}
