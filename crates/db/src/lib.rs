//! Data layer for petbook-rs.
//!
//! All persistence goes through the [`store::DocumentStore`] trait, which models
//! the narrow document-database contract the application relies on: point
//! reads/writes, create-if-absent, ordered cursor queries, and atomic multi-write
//! batches. [`memory::MemoryStore`] is the in-process implementation used for
//! local runs and tests.

pub mod documents;
pub mod memory;
pub mod paths;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use store::{
    Direction, DocumentSnapshot, DocumentStore, Filter, Query, QueryCursor, WriteBatch, WriteOp,
};
