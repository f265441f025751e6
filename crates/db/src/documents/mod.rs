//! Document types.
//!
//! Field names serialize in camelCase to match the stored document shape.
//! Optional fields are skipped when absent so documents never carry sentinel
//! nulls.

pub mod account;
pub mod answer;
pub mod comment;
pub mod medical;
pub mod post;
pub mod question;

pub use account::{Account, FollowEdge, UsernameReservation};
pub use answer::Answer;
pub use comment::Comment;
pub use medical::MedicalExtraction;
pub use post::{MediaKind, Post, Visibility};
pub use question::{PetContext, Question};
