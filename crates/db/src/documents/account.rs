//! Account, follow edge, and username reservation documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account document.
///
/// Created on first authentication; `username` is absent until onboarding
/// claims one and is immutable afterwards. The follow counters are
/// denormalized caches maintained exclusively by the atomic follow/unfollow
/// batches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account id (document id, duplicated in the body).
    pub id: String,

    /// Sign-in email, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    /// Claimed handle, normalized lowercase. Absent until onboarding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Profile bio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Number of accounts this account follows (denormalized).
    #[serde(default)]
    pub following_count: i64,

    /// Number of accounts following this account (denormalized).
    #[serde(default)]
    pub followers_count: i64,

    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account has completed onboarding (claimed a username).
    #[must_use]
    pub const fn is_onboarded(&self) -> bool {
        self.username.is_some()
    }
}

/// A directed follow edge, stored under both endpoints.
///
/// The document id is the account id at the other end of the edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdge {
    /// When the edge was created.
    pub followed_at: DateTime<Utc>,
}

/// A username reservation.
///
/// Keyed by the normalized username; existence of the document is the sole
/// availability signal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameReservation {
    /// Owning account id.
    pub uid: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_serializes_camel_case_without_null_optionals() {
        let account = Account {
            id: "u1".to_string(),
            email: None,
            display_name: Some("Ana".to_string()),
            photo_url: None,
            username: None,
            bio: None,
            following_count: 0,
            followers_count: 0,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
        };

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["displayName"], "Ana");
        assert_eq!(value["followersCount"], 0);
        assert!(value.get("username").is_none());
        assert!(value.get("photoUrl").is_none());
    }

    #[test]
    fn test_account_deserializes_with_defaults() {
        let account: Account = serde_json::from_value(json!({
            "id": "u1",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(account.following_count, 0);
        assert!(!account.is_onboarded());
    }
}
