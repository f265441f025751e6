//! Service layer.
//!
//! Services own validation and invariants; repositories own paths and batch
//! composition. Each service is cheap to clone and holds only repositories
//! and collaborator handles.

pub mod account;
pub mod feed;
pub mod qa;
pub mod registry;
pub mod social_graph;

pub use account::{AccountService, NewAccount};
pub use feed::{CommentDraft, FeedPage, FeedService, PostDraft};
pub use qa::{AnswerDraft, QaService, QuestionDraft, QuestionPage};
pub use registry::{UsernameRegistryService, normalize_username};
pub use social_graph::SocialGraphService;

use std::sync::Arc;

use petbook_common::config::Config;
use petbook_common::storage::MediaStorage;
use petbook_db::DocumentStore;
use petbook_db::repositories::{
    AccountRepository, AnswerRepository, CommentRepository, FollowRepository, PostRepository,
    QuestionRepository, UsernameRepository,
};

/// All services wired against one store and one storage backend.
#[derive(Clone)]
pub struct Services {
    /// Account lifecycle.
    pub accounts: AccountService,
    /// Username registry.
    pub registry: UsernameRegistryService,
    /// Follow graph.
    pub social_graph: SocialGraphService,
    /// Posts and comments.
    pub feed: FeedService,
    /// Questions and answers.
    pub qa: QaService,
}

impl Services {
    /// Build the full service set from configuration.
    #[must_use]
    pub fn build(
        config: &Config,
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn MediaStorage>,
    ) -> Self {
        let account_repo = AccountRepository::new(store.clone());

        Self {
            accounts: AccountService::new(account_repo.clone()),
            registry: UsernameRegistryService::new(
                UsernameRepository::new(store.clone()),
                account_repo.clone(),
            ),
            social_graph: SocialGraphService::new(
                FollowRepository::new(store.clone()),
                account_repo.clone(),
            ),
            feed: FeedService::new(
                PostRepository::new(store.clone()),
                CommentRepository::new(store.clone()),
                account_repo.clone(),
                storage.clone(),
                config.store.feed_page_size,
            ),
            qa: QaService::new(
                QuestionRepository::new(store.clone()),
                AnswerRepository::new(store),
                account_repo,
                storage,
                config.store.question_page_size,
            ),
        }
    }
}
