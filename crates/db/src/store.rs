//! Document store contract.
//!
//! The stores in this workspace never issue multi-step read-modify-write cycles
//! for invariant-preserving mutations; they describe the whole mutation as a
//! [`WriteBatch`] and hand it to the backend, which must apply it atomically.

use async_trait::async_trait;
use petbook_common::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document returned from a query, paired with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// Document id (final path segment).
    pub id: String,
    /// Document body.
    pub data: Value,
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// A field predicate applied server-side before ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals value.
    Eq(String, Value),
    /// Field is greater than or equal to value.
    Gte(String, Value),
    /// Field is strictly less than value.
    Lt(String, Value),
    /// Field is present and non-null.
    Exists(String),
}

/// Continuation point for a paginated query.
///
/// Holds the order-field value and id of the last document of the previous
/// page; the next page starts strictly after that position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCursor {
    /// Value of the order-by field on the last document.
    pub order_value: Value,
    /// Id of the last document (tie-break).
    pub doc_id: String,
}

/// An ordered, filtered, cursor-paginated collection query.
///
/// Documents missing the order-by field are excluded from ordered results.
#[derive(Debug, Clone)]
pub struct Query {
    /// Collection path, e.g. `posts` or `users/<id>/followers`.
    pub collection: String,
    /// Predicates, all of which must hold.
    pub filters: Vec<Filter>,
    /// Order-by field and direction.
    pub order_by: Option<(String, Direction)>,
    /// Resume strictly after this position.
    pub start_after: Option<QueryCursor>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl Query {
    /// Create a query over a collection with no predicates.
    #[must_use]
    pub fn collection(path: impl Into<String>) -> Self {
        Self {
            collection: path.into(),
            filters: Vec::new(),
            order_by: None,
            start_after: None,
            limit: None,
        }
    }

    /// Add a predicate.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Order results by a field.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Resume strictly after a cursor position.
    #[must_use]
    pub fn start_after(mut self, cursor: Option<QueryCursor>) -> Self {
        self.start_after = cursor;
        self
    }

    /// Bound the number of results.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A single write within a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Write a document, replacing it or merging fields into it.
    Set {
        /// Document path.
        path: String,
        /// Document body (or fields to merge).
        data: Value,
        /// Merge into the existing document instead of replacing it.
        merge: bool,
    },
    /// Create a document, failing with `Conflict` if it already exists.
    Create {
        /// Document path.
        path: String,
        /// Document body.
        data: Value,
    },
    /// Delete a document. Deleting a missing document is a no-op.
    Delete {
        /// Document path.
        path: String,
    },
    /// Add a delta to a numeric field of an existing document.
    ///
    /// A missing field starts from zero; a missing document fails the batch.
    Increment {
        /// Document path.
        path: String,
        /// Field name.
        field: String,
        /// Signed delta.
        delta: i64,
    },
    /// Add a value to an array field unless already present.
    ///
    /// A missing document fails the batch.
    ArrayUnion {
        /// Document path.
        path: String,
        /// Field name.
        field: String,
        /// Value to add.
        value: Value,
    },
    /// Remove all occurrences of a value from an array field.
    ///
    /// A missing document fails the batch.
    ArrayRemove {
        /// Document path.
        path: String,
        /// Field name.
        field: String,
        /// Value to remove.
        value: Value,
    },
}

/// An ordered set of writes that commit together or not at all.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    /// The writes, applied in order.
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Add a set write.
    #[must_use]
    pub fn set(mut self, path: impl Into<String>, data: Value, merge: bool) -> Self {
        self.ops.push(WriteOp::Set {
            path: path.into(),
            data,
            merge,
        });
        self
    }

    /// Add a create-if-absent write.
    #[must_use]
    pub fn create(mut self, path: impl Into<String>, data: Value) -> Self {
        self.ops.push(WriteOp::Create {
            path: path.into(),
            data,
        });
        self
    }

    /// Add a delete.
    #[must_use]
    pub fn delete(mut self, path: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Delete { path: path.into() });
        self
    }

    /// Add a numeric increment.
    #[must_use]
    pub fn increment(mut self, path: impl Into<String>, field: impl Into<String>, delta: i64) -> Self {
        self.ops.push(WriteOp::Increment {
            path: path.into(),
            field: field.into(),
            delta,
        });
        self
    }

    /// Add an array-union write.
    #[must_use]
    pub fn array_union(
        mut self,
        path: impl Into<String>,
        field: impl Into<String>,
        value: Value,
    ) -> Self {
        self.ops.push(WriteOp::ArrayUnion {
            path: path.into(),
            field: field.into(),
            value,
        });
        self
    }

    /// Add an array-remove write.
    #[must_use]
    pub fn array_remove(
        mut self,
        path: impl Into<String>,
        field: impl Into<String>,
        value: Value,
    ) -> Self {
        self.ops.push(WriteOp::ArrayRemove {
            path: path.into(),
            field: field.into(),
            value,
        });
        self
    }

    /// Whether the batch contains no writes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Document store client.
///
/// Implementations must provide read-after-write consistency and apply
/// [`WriteBatch`]es atomically: either every op takes effect or none does.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document.
    async fn get(&self, path: &str) -> AppResult<Option<Value>>;

    /// Write a document, replacing it or merging fields.
    async fn set(&self, path: &str, data: Value, merge: bool) -> AppResult<()>;

    /// Create a document, failing with `Conflict` if it already exists.
    async fn create(&self, path: &str, data: Value) -> AppResult<()>;

    /// Delete a document. Deleting a missing document is a no-op.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Run an ordered, filtered, cursor-paginated query.
    async fn query(&self, query: Query) -> AppResult<Vec<DocumentSnapshot>>;

    /// Apply a batch of writes atomically.
    async fn apply_batch(&self, batch: WriteBatch) -> AppResult<()>;
}
