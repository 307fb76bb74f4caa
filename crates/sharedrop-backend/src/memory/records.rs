//! [`RecordStore`] over in-memory collections of JSON rows.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::RecordStore;
use sharedrop_core::types::{RecordQuery, SortDirection};

use super::{MemoryBackend, Operation};

/// Columns whose non-null values must be unique within a collection.
const UNIQUE_COLUMNS: &[&str] = &["id", "share_token"];

fn timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Total order over the JSON scalars a sort column can hold.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn as_object(row: Value) -> AppResult<Map<String, Value>> {
    match row {
        Value::Object(map) => Ok(map),
        other => Err(AppError::validation(format!(
            "Rows must be JSON objects, got {other}"
        ))),
    }
}

impl MemoryBackend {
    fn query_rows(&self, collection: &str, query: &RecordQuery) -> Vec<Value> {
        let mut rows: Vec<Value> = self
            .collections
            .get(collection)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            // newest insert wins ties under descending order
            if order.direction == SortDirection::Desc {
                rows.reverse();
            }
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        rows
    }
}

#[async_trait]
impl RecordStore for MemoryBackend {
    async fn select(&self, collection: &str, query: &RecordQuery) -> AppResult<Vec<Value>> {
        self.enter(Operation::Select, collection)?;
        Ok(self.query_rows(collection, query))
    }

    async fn select_single(
        &self,
        collection: &str,
        query: &RecordQuery,
    ) -> AppResult<Option<Value>> {
        self.enter(Operation::SelectSingle, collection)?;
        let mut rows = self.query_rows(collection, query);
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(AppError::database(format!(
                "Expected a single row, found {n}"
            ))),
        }
    }

    async fn insert(&self, collection: &str, rows: Vec<Value>) -> AppResult<Vec<Value>> {
        self.enter(Operation::Insert, collection)?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let mut map = as_object(row)?;
            map.entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            let now = timestamp();
            map.entry("created_at").or_insert_with(|| now.clone());
            map.entry("updated_at").or_insert(now);
            stored.push(Value::Object(map));
        }

        let mut existing = self.collections.entry(collection.to_string()).or_default();
        for (i, row) in stored.iter().enumerate() {
            for column in UNIQUE_COLUMNS {
                let Some(value) = row.get(*column).filter(|v| !v.is_null()) else {
                    continue;
                };
                let taken = existing
                    .iter()
                    .chain(&stored[..i])
                    .any(|other| other.get(*column) == Some(value));
                if taken {
                    return Err(AppError::external(format!(
                        "duplicate key value violates unique constraint on \"{column}\""
                    )));
                }
            }
        }
        existing.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(
        &self,
        collection: &str,
        query: &RecordQuery,
        patch: Value,
    ) -> AppResult<Vec<Value>> {
        self.enter(Operation::Update, collection)?;
        let patch = as_object(patch)?;

        let mut updated = Vec::new();
        if let Some(mut rows) = self.collections.get_mut(collection) {
            for row in rows.iter_mut().filter(|r| query.matches(r)) {
                if let Value::Object(map) = row {
                    for (key, value) in &patch {
                        map.insert(key.clone(), value.clone());
                    }
                    map.insert("updated_at".to_string(), timestamp());
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, collection: &str, query: &RecordQuery) -> AppResult<()> {
        self.enter(Operation::Delete, collection)?;
        if let Some(mut rows) = self.collections.get_mut(collection) {
            rows.retain(|r| !query.matches(r));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sharedrop_core::error::ErrorKind;
    use sharedrop_core::types::SortField;

    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_server_fields() {
        let backend = MemoryBackend::default();
        let rows = backend
            .insert("files", vec![json!({"name": "a"})])
            .await
            .expect("insert");
        let row = &rows[0];
        assert!(row.get("id").and_then(Value::as_str).is_some());
        assert!(row.get("created_at").and_then(Value::as_str).is_some());
        assert_eq!(backend.rows("files").len(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_share_token() {
        let backend = MemoryBackend::default();
        backend
            .insert("files", vec![json!({"name": "a", "share_token": "tok"})])
            .await
            .expect("first");

        let err = backend
            .insert("files", vec![json!({"name": "b", "share_token": "tok"})])
            .await
            .expect_err("duplicate token");
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(err.message.contains("share_token"));
        assert_eq!(backend.rows("files").len(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_within_batch() {
        let backend = MemoryBackend::default();
        let err = backend
            .insert(
                "files",
                vec![
                    json!({"name": "a", "share_token": "same"}),
                    json!({"name": "b", "share_token": "same"}),
                ],
            )
            .await
            .expect_err("duplicate token");
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(backend.rows("files").is_empty());
    }

    #[tokio::test]
    async fn test_insert_allows_missing_tokens() {
        let backend = MemoryBackend::default();
        backend
            .insert("files", vec![json!({"name": "a"}), json!({"name": "b", "share_token": null})])
            .await
            .expect("insert");
        assert_eq!(backend.rows("files").len(), 2);
    }

    #[tokio::test]
    async fn test_select_orders_descending() {
        let backend = MemoryBackend::default();
        backend
            .insert(
                "files",
                vec![
                    json!({"name": "old", "created_at": "2024-01-01T00:00:00.000000Z"}),
                    json!({"name": "new", "created_at": "2024-03-01T00:00:00.000000Z"}),
                    json!({"name": "mid", "created_at": "2024-02-01T00:00:00.000000Z"}),
                ],
            )
            .await
            .expect("insert");

        let query = RecordQuery::new().order(SortField::desc("created_at"));
        let names: Vec<_> = backend
            .select("files", &query)
            .await
            .expect("select")
            .into_iter()
            .filter_map(|r| r.get("name").and_then(Value::as_str).map(String::from))
            .collect();
        assert_eq!(names, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_by_filter() {
        let backend = MemoryBackend::default();
        backend
            .insert(
                "files",
                vec![json!({"id": "1", "n": 0}), json!({"id": "2", "n": 0})],
            )
            .await
            .expect("insert");

        let updated = backend
            .update("files", &RecordQuery::new().eq("id", "1"), json!({"n": 5}))
            .await
            .expect("update");
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["n"], 5);

        backend
            .delete("files", &RecordQuery::new().eq("id", "2"))
            .await
            .expect("delete");
        let rows = backend.rows("files");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "1");
    }

    #[tokio::test]
    async fn test_select_single_cardinality() {
        let backend = MemoryBackend::default();
        let query = RecordQuery::new().eq("tag", "x");
        assert!(
            backend
                .select_single("files", &query)
                .await
                .expect("empty")
                .is_none()
        );

        backend
            .insert("files", vec![json!({"tag": "x"}), json!({"tag": "x"})])
            .await
            .expect("insert");
        let err = backend
            .select_single("files", &query)
            .await
            .expect_err("ambiguous");
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_insert_rejects_non_objects() {
        let backend = MemoryBackend::default();
        let err = backend
            .insert("files", vec![json!([1, 2])])
            .await
            .expect_err("array row");
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
