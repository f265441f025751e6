//! Social graph service.

use petbook_common::{AppError, AppResult};
use petbook_db::documents::{Account, FollowEdge};
use petbook_db::repositories::{AccountRepository, FollowRepository};

/// How many of the actor's follows are loaded when building suggestions.
const SUGGEST_FOLLOWING_WINDOW: usize = 100;

/// Social graph service for business logic.
///
/// Follow state is stored redundantly from both ends with denormalized
/// counters; every mutation goes through the repository's atomic batch so the
/// two edge copies and two counters can never disagree.
#[derive(Clone)]
pub struct SocialGraphService {
    follow_repo: FollowRepository,
    account_repo: AccountRepository,
}

impl SocialGraphService {
    /// Create a new social graph service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, account_repo: AccountRepository) -> Self {
        Self {
            follow_repo,
            account_repo,
        }
    }

    /// Follow an account.
    ///
    /// Self-follow is rejected. Following an already-followed account is a
    /// silent no-op: repeating the action must never move the counters.
    pub async fn follow(&self, actor_id: &str, target_id: &str) -> AppResult<()> {
        if actor_id == target_id {
            return Err(AppError::Validation("Cannot follow yourself".to_string()));
        }

        // Both endpoints must exist before edges are written.
        self.account_repo.get_by_id(actor_id).await?;
        self.account_repo.get_by_id(target_id).await?;

        if self.follow_repo.is_following(actor_id, target_id).await? {
            tracing::debug!(actor_id, target_id, "Already following, no-op");
            return Ok(());
        }

        // A racer that slipped past the check loses on the edge create;
        // that loss is the same no-op, not an error.
        match self.follow_repo.follow(actor_id, target_id).await {
            Err(AppError::Conflict(_)) => {
                tracing::debug!(actor_id, target_id, "Lost follow race, no-op");
                Ok(())
            }
            Ok(()) => {
                tracing::debug!(actor_id, target_id, "Followed");
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    /// Unfollow an account.
    ///
    /// Unfollowing a non-followed target (including yourself) is a safe
    /// no-op; counters are only decremented when an edge actually existed.
    /// Two unfollows racing past the check can still both decrement: the
    /// store has no delete-if-present op to fail the loser's batch on. The
    /// window needs the same account to issue the same unfollow twice
    /// concurrently, which no sequential client does.
    pub async fn unfollow(&self, actor_id: &str, target_id: &str) -> AppResult<()> {
        if actor_id == target_id {
            return Ok(());
        }

        if !self.follow_repo.is_following(actor_id, target_id).await? {
            tracing::debug!(actor_id, target_id, "Not following, no-op");
            return Ok(());
        }

        self.follow_repo.unfollow(actor_id, target_id).await?;
        tracing::debug!(actor_id, target_id, "Unfollowed");
        Ok(())
    }

    /// Check if `actor` follows `target`.
    pub async fn is_following(&self, actor_id: &str, target_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(actor_id, target_id).await
    }

    /// Followers of an account, most recent first.
    pub async fn list_followers(
        &self,
        account_id: &str,
        limit: usize,
    ) -> AppResult<Vec<(String, FollowEdge)>> {
        self.follow_repo.list_followers(account_id, limit).await
    }

    /// Accounts an account follows, most recent first.
    pub async fn list_following(
        &self,
        account_id: &str,
        limit: usize,
    ) -> AppResult<Vec<(String, FollowEdge)>> {
        self.follow_repo.list_following(account_id, limit).await
    }

    /// Suggest accounts to follow.
    ///
    /// Onboarded accounts in username order, excluding the actor and everyone
    /// they already follow. Advisory only; the ordering is just a stable
    /// tie-break.
    pub async fn suggest(&self, account_id: &str, limit: usize) -> AppResult<Vec<Account>> {
        let following = self
            .follow_repo
            .list_following(account_id, SUGGEST_FOLLOWING_WINDOW)
            .await?;

        let mut excluded: Vec<&str> = following.iter().map(|(id, _)| id.as_str()).collect();
        excluded.push(account_id);

        let candidates = self
            .account_repo
            .list_onboarded(limit + excluded.len())
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|account| !excluded.contains(&account.id.as_str()))
            .take(limit)
            .collect())
    }
}
