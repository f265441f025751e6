//! Document path layout.
//!
//! All repositories address documents through these helpers so the collection
//! layout lives in exactly one place. Follow edges are stored redundantly from
//! both ends as subcollections under the account.

/// Accounts collection.
pub const USERS: &str = "users";
/// Username reservations collection.
pub const USERNAMES: &str = "usernames";
/// Posts collection.
pub const POSTS: &str = "posts";
/// Comments collection.
pub const COMMENTS: &str = "comments";
/// Questions collection.
pub const QUESTIONS: &str = "questions";
/// Answers collection.
pub const ANSWERS: &str = "answers";

/// Path of an account document.
#[must_use]
pub fn account(id: &str) -> String {
    format!("{USERS}/{id}")
}

/// Path of a username reservation. The id is the normalized username.
#[must_use]
pub fn username(normalized: &str) -> String {
    format!("{USERNAMES}/{normalized}")
}

/// `following` subcollection of an account.
#[must_use]
pub fn following_collection(account_id: &str) -> String {
    format!("{USERS}/{account_id}/following")
}

/// `followers` subcollection of an account.
#[must_use]
pub fn followers_collection(account_id: &str) -> String {
    format!("{USERS}/{account_id}/followers")
}

/// Edge under the follower: `users/<actor>/following/<target>`.
#[must_use]
pub fn following_edge(actor_id: &str, target_id: &str) -> String {
    format!("{USERS}/{actor_id}/following/{target_id}")
}

/// Edge under the followee: `users/<target>/followers/<actor>`.
#[must_use]
pub fn follower_edge(target_id: &str, actor_id: &str) -> String {
    format!("{USERS}/{target_id}/followers/{actor_id}")
}

/// Path of a post document.
#[must_use]
pub fn post(id: &str) -> String {
    format!("{POSTS}/{id}")
}

/// Path of a comment document.
#[must_use]
pub fn comment(id: &str) -> String {
    format!("{COMMENTS}/{id}")
}

/// Path of a question document.
#[must_use]
pub fn question(id: &str) -> String {
    format!("{QUESTIONS}/{id}")
}

/// Path of an answer document.
#[must_use]
pub fn answer(id: &str) -> String {
    format!("{ANSWERS}/{id}")
}
