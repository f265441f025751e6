//! Question document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pet details attached to a question.
///
/// Denormalized at question time so answers (including AI ones) can be
/// tailored without a second lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetContext {
    /// Pet id.
    pub pet_id: String,
    /// Pet name.
    pub name: String,
    /// Species, e.g. "Dog".
    pub species: String,
    /// Breed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    /// Birth date as an ISO date string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

/// A Q&A question.
///
/// `answer_count` is a denormalized cache maintained only by the atomic
/// add-answer batch; it must never drift from the actual answer count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Question id (document id, duplicated in the body).
    pub id: String,

    /// Owning account id.
    pub user_id: String,

    /// Author display name (denormalized).
    pub author_name: String,

    /// Mandatory pet context.
    pub pet: PetContext,

    /// Question title.
    pub title: String,

    /// Question body.
    pub content: String,

    /// Optional attached image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Account ids that upvoted this question. Order is irrelevant.
    #[serde(default)]
    pub upvotes: Vec<String>,

    /// Number of answers (denormalized).
    #[serde(default)]
    pub answer_count: i64,

    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}
