//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for documents.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a random, non-time-ordered ID.
    ///
    /// Used where creation order must not be inferable from the identifier.
    #[must_use]
    pub fn generate_opaque(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
