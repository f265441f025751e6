//! Account service.

use chrono::Utc;
use petbook_common::AppResult;
use petbook_db::documents::Account;
use petbook_db::repositories::{AccountRepository, ProfileUpdate};

/// Input for account creation on first authentication.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Account id from the authentication layer.
    pub id: String,
    /// Sign-in email, if known.
    pub email: Option<String>,
    /// Display name from the identity provider.
    pub display_name: Option<String>,
    /// Avatar URL from the identity provider.
    pub photo_url: Option<String>,
}

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    account_repo: AccountRepository,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(account_repo: AccountRepository) -> Self {
        Self { account_repo }
    }

    /// Fetch an account, creating it on first authentication.
    ///
    /// The created account has no username yet; onboarding claims one later.
    pub async fn get_or_create(&self, input: NewAccount) -> AppResult<Account> {
        if let Some(existing) = self.account_repo.find_by_id(&input.id).await? {
            return Ok(existing);
        }

        let account = Account {
            id: input.id,
            email: input.email,
            display_name: input.display_name,
            photo_url: input.photo_url,
            username: None,
            bio: None,
            following_count: 0,
            followers_count: 0,
            created_at: Utc::now(),
        };
        self.account_repo.create(&account).await?;
        tracing::info!(account_id = %account.id, "Created account");
        Ok(account)
    }

    /// Get an account by id.
    pub async fn get(&self, id: &str) -> AppResult<Account> {
        self.account_repo.get_by_id(id).await
    }

    /// Update mutable profile fields.
    pub async fn update_profile(&self, id: &str, update: ProfileUpdate) -> AppResult<()> {
        // Ensure the account exists so a merge cannot conjure a document.
        self.account_repo.get_by_id(id).await?;
        self.account_repo.update_profile(id, &update).await
    }
}
