//! Post document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of media a post carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A single image.
    Image,
    /// A single video.
    Video,
    /// Multiple images shown as a carousel.
    Carousel,
}

/// Who can see a post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone.
    #[default]
    Public,
    /// Visible to mutual follows.
    Friends,
    /// Visible to the owner only.
    Private,
}

/// A feed post.
///
/// `likes` is a set of account ids; membership is mutated only through
/// array-union/array-remove store ops, never by rewriting the whole array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post id (document id, duplicated in the body).
    pub id: String,

    /// Owning account id.
    pub user_id: String,

    /// Author display name at post time (denormalized).
    pub author_name: String,

    /// Author avatar URL at post time (denormalized).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_photo: Option<String>,

    /// Media URLs, 1 to 5 entries, in display order.
    pub media_urls: Vec<String>,

    /// Kind of media.
    pub media_kind: MediaKind,

    /// Caption text.
    pub caption: String,

    /// Account ids that liked this post. Order is irrelevant.
    #[serde(default)]
    pub likes: Vec<String>,

    /// Visibility.
    #[serde(default)]
    pub visibility: Visibility,

    /// Optional tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Pet this post is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<String>,

    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}
