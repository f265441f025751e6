//! Answer document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An answer to a question. Content is immutable once created.
///
/// Answers authored by the AI assistant carry `is_ai_generated = true`; the
/// store itself is agnostic to who supplied the content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Answer id (document id, duplicated in the body).
    pub id: String,

    /// Question this answer belongs to.
    pub question_id: String,

    /// Authoring account id, or the designated AI identity.
    pub user_id: String,

    /// Author display name (denormalized).
    pub author_name: String,

    /// Answer text.
    pub content: String,

    /// Whether this answer was produced by the AI assistant.
    #[serde(default)]
    pub is_ai_generated: bool,

    /// Account ids that upvoted this answer. Order is irrelevant.
    #[serde(default)]
    pub upvotes: Vec<String>,

    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}
