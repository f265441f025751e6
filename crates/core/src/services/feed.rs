//! Feed service.

use std::sync::Arc;

use chrono::Utc;
use petbook_common::storage::MediaStorage;
use petbook_common::{AppError, AppResult};
use petbook_db::documents::{Account, Comment, MediaKind, Post, Visibility};
use petbook_db::repositories::{AccountRepository, CommentRepository, PostRepository};
use petbook_db::QueryCursor;

use crate::generate_id;
use crate::pagination::{decode_cursor, encode_cursor};

/// Maximum media attachments per post.
pub const MAX_POST_MEDIA: usize = 5;

/// Input for post creation.
#[derive(Debug, Clone)]
pub struct PostDraft {
    /// Media URLs, in display order.
    pub media_urls: Vec<String>,
    /// Kind of media.
    pub media_kind: MediaKind,
    /// Caption text.
    pub caption: String,
    /// Visibility.
    pub visibility: Visibility,
    /// Optional tags.
    pub tags: Option<Vec<String>>,
    /// Pet this post is about, if any.
    pub pet_id: Option<String>,
}

/// Input for comment creation.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    /// Post being commented on.
    pub post_id: String,
    /// Comment text.
    pub content: String,
}

/// One page of the global feed.
#[derive(Debug, Clone)]
pub struct FeedPage {
    /// Posts, newest first.
    pub posts: Vec<Post>,
    /// Token for the next page, absent when this page was short.
    pub next_cursor: Option<String>,
}

fn author_name(account: &Account) -> String {
    account
        .display_name
        .clone()
        .or_else(|| account.username.clone())
        .unwrap_or_else(|| "Anonymous".to_string())
}

/// Feed service for business logic.
///
/// Author name and photo are denormalized into posts and comments at write
/// time; later profile edits do not rewrite old content.
#[derive(Clone)]
pub struct FeedService {
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    account_repo: AccountRepository,
    storage: Arc<dyn MediaStorage>,
    page_size: usize,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        account_repo: AccountRepository,
        storage: Arc<dyn MediaStorage>,
        page_size: usize,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            account_repo,
            storage,
            page_size,
        }
    }

    /// Create a post.
    ///
    /// Creation time is assigned here, never taken from the caller, so the
    /// feed order is decided by the server clock.
    pub async fn create_post(&self, author_id: &str, draft: PostDraft) -> AppResult<Post> {
        if draft.media_urls.is_empty() {
            return Err(AppError::Validation(
                "A post needs at least one media attachment".to_string(),
            ));
        }
        if draft.media_urls.len() > MAX_POST_MEDIA {
            return Err(AppError::Validation(format!(
                "A post can carry at most {MAX_POST_MEDIA} media attachments"
            )));
        }

        let account = self.account_repo.get_by_id(author_id).await?;

        let post = Post {
            id: generate_id(),
            user_id: account.id.clone(),
            author_name: author_name(&account),
            author_photo: account.photo_url,
            media_urls: draft.media_urls,
            media_kind: draft.media_kind,
            caption: draft.caption,
            likes: Vec::new(),
            visibility: draft.visibility,
            tags: draft.tags,
            pet_id: draft.pet_id,
            created_at: Utc::now(),
        };
        self.post_repo.create(&post).await?;

        tracing::info!(post_id = %post.id, author_id, "Created post");
        Ok(post)
    }

    /// Get a post by id.
    pub async fn get_post(&self, id: &str) -> AppResult<Post> {
        self.post_repo.get_by_id(id).await
    }

    /// One page of the global feed, newest first.
    ///
    /// Pass back `next_cursor` to resume; a repeated token never re-yields
    /// the items before it, even when new posts land in between.
    pub async fn list_posts(&self, cursor: Option<&str>) -> AppResult<FeedPage> {
        let start_after = cursor.map(decode_cursor).transpose()?;
        let posts = self.post_repo.list(start_after, self.page_size).await?;

        let next_cursor = if posts.len() == self.page_size {
            posts.last().map(|last| {
                encode_cursor(&QueryCursor {
                    order_value: serde_json::json!(last.created_at),
                    doc_id: last.id.clone(),
                })
            })
        } else {
            None
        };

        Ok(FeedPage { posts, next_cursor })
    }

    /// Toggle an account's like on a post. Returns the new liked state.
    ///
    /// Likes form a set; toggling twice always lands back where it started
    /// and concurrent likes from different accounts never clobber each other.
    pub async fn toggle_like(&self, post_id: &str, account_id: &str) -> AppResult<bool> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if post.likes.iter().any(|id| id == account_id) {
            self.post_repo.remove_like(post_id, account_id).await?;
            Ok(false)
        } else {
            self.post_repo.add_like(post_id, account_id).await?;
            Ok(true)
        }
    }

    /// Add a comment to a post.
    pub async fn add_comment(&self, author_id: &str, draft: CommentDraft) -> AppResult<Comment> {
        if draft.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        // The post must still exist; comments never dangle at write time.
        self.post_repo.get_by_id(&draft.post_id).await?;
        let account = self.account_repo.get_by_id(author_id).await?;

        let comment = Comment {
            id: generate_id(),
            post_id: draft.post_id,
            user_id: account.id.clone(),
            author_name: author_name(&account),
            author_photo: account.photo_url,
            content: draft.content,
            created_at: Utc::now(),
        };
        self.comment_repo.create(&comment).await?;
        Ok(comment)
    }

    /// Comments of a post, oldest first.
    pub async fn list_comments(&self, post_id: &str) -> AppResult<Vec<Comment>> {
        self.comment_repo.list_for_post(post_id).await
    }

    /// Delete a post. Only the owner may delete.
    ///
    /// The document delete is authoritative; media blob deletion is
    /// best-effort and an orphaned blob is only logged.
    pub async fn delete_post(&self, post_id: &str, actor_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;
        if post.user_id != actor_id {
            return Err(AppError::Forbidden(
                "Only the post owner can delete it".to_string(),
            ));
        }

        self.post_repo.delete(post_id).await?;

        for url in &post.media_urls {
            if let Err(error) = self.storage.delete(url).await {
                tracing::warn!(post_id, url, %error, "Failed to delete post media");
            }
        }

        tracing::info!(post_id, actor_id, "Deleted post");
        Ok(())
    }
}
