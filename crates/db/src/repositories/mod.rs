//! Repositories.
//!
//! One repository per aggregate. Repositories own document paths and batch
//! composition; invariant-preserving multi-document mutations are always built
//! as a single [`crate::store::WriteBatch`] here, never as sequential writes.

mod account;
mod answer;
mod comment;
mod follow;
mod post;
mod question;
mod username;

pub use account::{AccountRepository, ProfileUpdate};
pub use answer::AnswerRepository;
pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use post::PostRepository;
pub use question::QuestionRepository;
pub use username::UsernameRepository;

use petbook_common::AppResult;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a stored document body into a typed document.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    Ok(serde_json::from_value(value)?)
}
