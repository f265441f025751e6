//! Comment document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a post. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment id (document id, duplicated in the body).
    pub id: String,

    /// Post this comment belongs to.
    pub post_id: String,

    /// Authoring account id.
    pub user_id: String,

    /// Author display name at comment time (denormalized).
    pub author_name: String,

    /// Author avatar URL at comment time (denormalized).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_photo: Option<String>,

    /// Comment text.
    pub content: String,

    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}
