//! Core business logic for petbook-rs.

pub mod pagination;
pub mod services;

pub use services::*;

/// Generate a unique document ID.
#[must_use]
pub fn generate_id() -> String {
    petbook_common::IdGenerator::new().generate()
}
