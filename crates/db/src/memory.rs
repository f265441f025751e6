//! In-process document store.
//!
//! [`MemoryStore`] implements [`DocumentStore`] over a single map guarded by one
//! mutex, which makes batch atomicity exact: a batch is validated and applied
//! against a staged copy and only committed if every op succeeds. Used as the
//! local backend and as the test double for the stores.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::DateTime;
use petbook_common::{AppError, AppResult};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::store::{
    Direction, DocumentSnapshot, DocumentStore, Filter, Query, QueryCursor, WriteBatch, WriteOp,
};

/// In-memory document store with atomic batches.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored.
    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.docs.lock().await.is_empty()
    }
}

/// Total order over JSON values used for range filters and ordering.
///
/// Null < Bool < Number < String < Array < Object; numbers compare as f64.
/// Strings that both parse as RFC 3339 timestamps compare chronologically;
/// serialized subsecond width varies, so lexicographic order would misplace
/// same-second values. Other strings compare lexicographically.
fn compare_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    const fn type_rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn matches_filter(data: &Value, filter: &Filter) -> bool {
    let field_value = |field: &str| data.get(field).cloned().unwrap_or(Value::Null);
    match filter {
        Filter::Eq(field, value) => &field_value(field) == value,
        Filter::Gte(field, value) => {
            compare_values(&field_value(field), value) != std::cmp::Ordering::Less
        }
        Filter::Lt(field, value) => {
            compare_values(&field_value(field), value) == std::cmp::Ordering::Less
        }
        Filter::Exists(field) => !matches!(field_value(field), Value::Null),
    }
}

fn apply_op(docs: &mut BTreeMap<String, Value>, op: &WriteOp) -> AppResult<()> {
    match op {
        WriteOp::Set { path, data, merge } => {
            if *merge {
                if let Some(Value::Object(existing)) = docs.get_mut(path) {
                    if let Value::Object(fields) = data {
                        for (k, v) in fields {
                            existing.insert(k.clone(), v.clone());
                        }
                        return Ok(());
                    }
                }
            }
            docs.insert(path.clone(), data.clone());
            Ok(())
        }
        WriteOp::Create { path, data } => {
            if docs.contains_key(path) {
                return Err(AppError::Conflict(format!("Document exists: {path}")));
            }
            docs.insert(path.clone(), data.clone());
            Ok(())
        }
        WriteOp::Delete { path } => {
            docs.remove(path);
            Ok(())
        }
        WriteOp::Increment { path, field, delta } => {
            let doc = docs
                .get_mut(path)
                .ok_or_else(|| AppError::NotFound(format!("Document missing: {path}")))?;
            let Value::Object(fields) = doc else {
                return Err(AppError::Internal(format!("Not an object: {path}")));
            };
            let current = match fields.get(field) {
                None | Some(Value::Null) => 0,
                Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
                Some(_) => {
                    return Err(AppError::Internal(format!(
                        "Field is not numeric: {path}.{field}"
                    )));
                }
            };
            fields.insert(field.clone(), Value::from(current + delta));
            Ok(())
        }
        WriteOp::ArrayUnion { path, field, value } => {
            let array = array_field(docs, path, field)?;
            if !array.contains(value) {
                array.push(value.clone());
            }
            Ok(())
        }
        WriteOp::ArrayRemove { path, field, value } => {
            let array = array_field(docs, path, field)?;
            array.retain(|v| v != value);
            Ok(())
        }
    }
}

fn array_field<'a>(
    docs: &'a mut BTreeMap<String, Value>,
    path: &str,
    field: &str,
) -> AppResult<&'a mut Vec<Value>> {
    let doc = docs
        .get_mut(path)
        .ok_or_else(|| AppError::NotFound(format!("Document missing: {path}")))?;
    let Value::Object(fields) = doc else {
        return Err(AppError::Internal(format!("Not an object: {path}")));
    };
    let entry = fields
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    match entry {
        Value::Array(array) => Ok(array),
        _ => Err(AppError::Internal(format!(
            "Field is not an array: {path}.{field}"
        ))),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> AppResult<Option<Value>> {
        Ok(self.docs.lock().await.get(path).cloned())
    }

    async fn set(&self, path: &str, data: Value, merge: bool) -> AppResult<()> {
        let mut docs = self.docs.lock().await;
        apply_op(
            &mut docs,
            &WriteOp::Set {
                path: path.to_string(),
                data,
                merge,
            },
        )
    }

    async fn create(&self, path: &str, data: Value) -> AppResult<()> {
        let mut docs = self.docs.lock().await;
        apply_op(
            &mut docs,
            &WriteOp::Create {
                path: path.to_string(),
                data,
            },
        )
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.docs.lock().await.remove(path);
        Ok(())
    }

    async fn query(&self, query: Query) -> AppResult<Vec<DocumentSnapshot>> {
        let docs = self.docs.lock().await;
        let prefix = format!("{}/", query.collection.trim_end_matches('/'));

        let mut results: Vec<DocumentSnapshot> = docs
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter_map(|(path, data)| {
                let id = &path[prefix.len()..];
                // Exclude documents of nested subcollections.
                if id.contains('/') {
                    return None;
                }
                query
                    .filters
                    .iter()
                    .all(|f| matches_filter(data, f))
                    .then(|| DocumentSnapshot {
                        id: id.to_string(),
                        data: data.clone(),
                    })
            })
            .collect();

        if let Some((field, direction)) = &query.order_by {
            // Documents without the order-by field do not participate.
            results.retain(|snap| !matches!(snap.data.get(field), None | Some(Value::Null)));

            results.sort_by(|a, b| {
                let ord = compare_values(
                    a.data.get(field).unwrap_or(&Value::Null),
                    b.data.get(field).unwrap_or(&Value::Null),
                )
                .then_with(|| a.id.cmp(&b.id));
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });

            if let Some(cursor) = &query.start_after {
                let after = |snap: &DocumentSnapshot| {
                    let ord = compare_values(
                        snap.data.get(field).unwrap_or(&Value::Null),
                        &cursor.order_value,
                    )
                    .then_with(|| snap.id.cmp(&cursor.doc_id));
                    match direction {
                        Direction::Asc => ord == std::cmp::Ordering::Greater,
                        Direction::Desc => ord == std::cmp::Ordering::Less,
                    }
                };
                results.retain(after);
            }
        }

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        Ok(results)
    }

    async fn apply_batch(&self, batch: WriteBatch) -> AppResult<()> {
        let mut docs = self.docs.lock().await;

        // Stage the whole batch; commit only if every op succeeds.
        let mut staged = docs.clone();
        for op in &batch.ops {
            apply_op(&mut staged, op)?;
        }
        *docs = staged;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_then_conflict() {
        let store = MemoryStore::new();
        store
            .create("usernames/buddy", json!({"uid": "u1"}))
            .await
            .unwrap();

        let result = store.create("usernames/buddy", json!({"uid": "u2"})).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Loser did not overwrite the winner.
        let doc = store.get("usernames/buddy").await.unwrap().unwrap();
        assert_eq!(doc["uid"], "u1");
    }

    #[tokio::test]
    async fn test_set_merge_preserves_other_fields() {
        let store = MemoryStore::new();
        store
            .set("users/u1", json!({"displayName": "Ana", "followersCount": 3}), false)
            .await
            .unwrap();
        store
            .set("users/u1", json!({"bio": "dog person"}), true)
            .await
            .unwrap();

        let doc = store.get("users/u1").await.unwrap().unwrap();
        assert_eq!(doc["displayName"], "Ana");
        assert_eq!(doc["followersCount"], 3);
        assert_eq!(doc["bio"], "dog person");
    }

    #[tokio::test]
    async fn test_batch_is_atomic() {
        let store = MemoryStore::new();
        store.set("users/u1", json!({"followingCount": 0}), false).await.unwrap();
        store
            .create("usernames/taken", json!({"uid": "u9"}))
            .await
            .unwrap();

        // Second op conflicts; the increment before it must not stick.
        let batch = WriteBatch::new()
            .increment("users/u1", "followingCount", 1)
            .create("usernames/taken", json!({"uid": "u1"}));

        let result = store.apply_batch(batch).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let doc = store.get("users/u1").await.unwrap().unwrap();
        assert_eq!(doc["followingCount"], 0);
    }

    #[tokio::test]
    async fn test_increment_missing_doc_fails_batch() {
        let store = MemoryStore::new();
        let batch = WriteBatch::new().increment("users/ghost", "followersCount", 1);
        let result = store.apply_batch(batch).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_array_union_is_idempotent() {
        let store = MemoryStore::new();
        store.set("posts/p1", json!({"likes": []}), false).await.unwrap();

        for _ in 0..2 {
            let batch = WriteBatch::new().array_union("posts/p1", "likes", json!("u1"));
            store.apply_batch(batch).await.unwrap();
        }

        let doc = store.get("posts/p1").await.unwrap().unwrap();
        assert_eq!(doc["likes"], json!(["u1"]));

        let batch = WriteBatch::new().array_remove("posts/p1", "likes", json!("u1"));
        store.apply_batch(batch).await.unwrap();
        let doc = store.get("posts/p1").await.unwrap().unwrap();
        assert_eq!(doc["likes"], json!([]));
    }

    #[tokio::test]
    async fn test_query_order_and_filters() {
        let store = MemoryStore::new();
        store
            .set("comments/c1", json!({"postId": "p1", "createdAt": "2024-01-01T00:00:00Z"}), false)
            .await
            .unwrap();
        store
            .set("comments/c2", json!({"postId": "p2", "createdAt": "2024-01-02T00:00:00Z"}), false)
            .await
            .unwrap();
        store
            .set("comments/c3", json!({"postId": "p1", "createdAt": "2024-01-03T00:00:00Z"}), false)
            .await
            .unwrap();

        let results = store
            .query(
                Query::collection("comments")
                    .filter(Filter::Eq("postId".to_string(), json!("p1")))
                    .order_by("createdAt", Direction::Asc),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "c1");
        assert_eq!(results[1].id, "c3");
    }

    #[tokio::test]
    async fn test_order_chronological_across_subsecond_widths() {
        let store = MemoryStore::new();
        // Same second, serialized at different subsecond widths; plain string
        // order would put p1 after p2.
        store
            .set("posts/p1", json!({"createdAt": "2024-01-01T00:00:00.123Z"}), false)
            .await
            .unwrap();
        store
            .set("posts/p2", json!({"createdAt": "2024-01-01T00:00:00.123456Z"}), false)
            .await
            .unwrap();
        store
            .set("posts/p3", json!({"createdAt": "2024-01-01T00:00:01Z"}), false)
            .await
            .unwrap();

        let results = store
            .query(
                Query::collection("posts")
                    .order_by("createdAt", Direction::Desc),
            )
            .await
            .unwrap();

        let ids: Vec<_> = results.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec!["p3", "p2", "p1"]);
    }

    #[tokio::test]
    async fn test_query_excludes_subcollection_docs() {
        let store = MemoryStore::new();
        store.set("users/u1", json!({"username": "ana"}), false).await.unwrap();
        store
            .set("users/u1/following/u2", json!({"followedAt": "2024-01-01T00:00:00Z"}), false)
            .await
            .unwrap();

        let results = store.query(Query::collection("users")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "u1");
    }

    #[tokio::test]
    async fn test_query_cursor_pagination_desc() {
        let store = MemoryStore::new();
        for i in 1..=5 {
            store
                .set(
                    format!("posts/p{i}").as_str(),
                    json!({"createdAt": format!("2024-01-0{i}T00:00:00Z")}),
                    false,
                )
                .await
                .unwrap();
        }

        let page1 = store
            .query(
                Query::collection("posts")
                    .order_by("createdAt", Direction::Desc)
                    .limit(2),
            )
            .await
            .unwrap();
        assert_eq!(page1[0].id, "p5");
        assert_eq!(page1[1].id, "p4");

        let cursor = QueryCursor {
            order_value: page1[1].data["createdAt"].clone(),
            doc_id: page1[1].id.clone(),
        };
        let page2 = store
            .query(
                Query::collection("posts")
                    .order_by("createdAt", Direction::Desc)
                    .start_after(Some(cursor))
                    .limit(2),
            )
            .await
            .unwrap();
        assert_eq!(page2[0].id, "p3");
        assert_eq!(page2[1].id, "p2");
    }

    #[tokio::test]
    async fn test_cursor_stable_under_concurrent_insert() {
        let store = MemoryStore::new();
        for i in 2..=4 {
            store
                .set(
                    format!("posts/p{i}").as_str(),
                    json!({"createdAt": format!("2024-01-0{i}T00:00:00Z")}),
                    false,
                )
                .await
                .unwrap();
        }

        let page1 = store
            .query(
                Query::collection("posts")
                    .order_by("createdAt", Direction::Desc)
                    .limit(2),
            )
            .await
            .unwrap();
        assert_eq!(page1[0].id, "p4");

        // A newer post arrives after the cursor was issued.
        store
            .set("posts/p9", json!({"createdAt": "2024-01-09T00:00:00Z"}), false)
            .await
            .unwrap();

        let cursor = QueryCursor {
            order_value: page1[1].data["createdAt"].clone(),
            doc_id: page1[1].id.clone(),
        };
        let page2 = store
            .query(
                Query::collection("posts")
                    .order_by("createdAt", Direction::Desc)
                    .start_after(Some(cursor))
                    .limit(2),
            )
            .await
            .unwrap();

        // Already-returned posts do not reappear and none are skipped.
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].id, "p2");
    }

    #[tokio::test]
    async fn test_exists_filter_and_missing_order_field() {
        let store = MemoryStore::new();
        store
            .set("users/u1", json!({"username": "ana"}), false)
            .await
            .unwrap();
        store
            .set("users/u2", json!({"username": null}), false)
            .await
            .unwrap();
        store.set("users/u3", json!({}), false).await.unwrap();

        let results = store
            .query(
                Query::collection("users")
                    .filter(Filter::Exists("username".to_string()))
                    .order_by("username", Direction::Asc),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "u1");
    }
}
