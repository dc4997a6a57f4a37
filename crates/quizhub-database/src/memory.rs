//! In-memory store backend.
//!
//! All transactions are serialized behind one async mutex. A transaction
//! works on a private copy of the tables and swaps it in on commit, so a
//! rollback (or a dropped transaction) leaves nothing behind.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::entity::DELETED_AT;
use quizhub_core::traits::{Record, Store, StoreTx};
use quizhub_core::types::{FilterField, FilterOp, FilterValue, Query};

type Tables = HashMap<String, BTreeMap<Uuid, Record>>;

/// Unlimited write budget.
const UNLIMITED: i64 = -1;

static NULL: Value = Value::Null;

/// Store backed by process memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    write_budget: Arc<AtomicI64>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::new())),
            write_budget: Arc::new(AtomicI64::new(UNLIMITED)),
        }
    }

    /// Make every write after the next `writes` successful ones fail with a
    /// database error. Used to exercise rollback paths.
    pub fn fail_writes_after(&self, writes: u32) {
        self.write_budget
            .store(i64::from(writes), AtomicOrdering::SeqCst);
    }

    /// Remove an injected write failure.
    pub fn clear_write_failures(&self) {
        self.write_budget.store(UNLIMITED, AtomicOrdering::SeqCst);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            working,
            write_budget: Arc::clone(&self.write_budget),
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
    write_budget: Arc<AtomicI64>,
}

impl MemoryTx {
    fn consume_write(&self) -> AppResult<()> {
        let remaining = self.write_budget.load(AtomicOrdering::SeqCst);
        if remaining == UNLIMITED {
            return Ok(());
        }
        if remaining == 0 {
            return Err(AppError::database("Injected write failure"));
        }
        self.write_budget.fetch_sub(1, AtomicOrdering::SeqCst);
        Ok(())
    }

    fn rows(&self, table: &str) -> impl Iterator<Item = &Record> {
        self.working.get(table).into_iter().flat_map(|t| t.values())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn get(&mut self, table: &str, id: Uuid) -> AppResult<Option<Record>> {
        Ok(self.working.get(table).and_then(|t| t.get(&id)).cloned())
    }

    async fn find(&mut self, table: &str, query: &Query) -> AppResult<Vec<Record>> {
        let mut rows: Vec<Record> = self
            .rows(table)
            .filter(|r| matches_all(r, &query.filters))
            .cloned()
            .collect();

        if let Some(sort) = &query.order_by {
            rows.sort_by(|a, b| {
                sort.direction
                    .apply(compare_values(field(a, &sort.field), field(b, &sort.field)))
            });
        }

        let offset = query.offset.unwrap_or(0) as usize;
        let rows = rows.into_iter().skip(offset);
        Ok(match query.limit {
            Some(limit) => rows.take(limit as usize).collect(),
            None => rows.collect(),
        })
    }

    async fn count(&mut self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        Ok(self.rows(table).filter(|r| matches_all(r, filters)).count() as u64)
    }

    async fn insert(&mut self, table: &str, row: Record) -> AppResult<Uuid> {
        self.consume_write()?;
        let id = record_id(table, &row)?;
        let rows = self.working.entry(table.to_string()).or_default();
        if rows.contains_key(&id) {
            return Err(AppError::database(format!(
                "Duplicate key {id} in table '{table}'"
            )));
        }
        rows.insert(id, row);
        Ok(id)
    }

    async fn update(&mut self, table: &str, id: Uuid, patch: Record) -> AppResult<bool> {
        self.consume_write()?;
        let Some(row) = self.working.get_mut(table).and_then(|t| t.get_mut(&id)) else {
            return Ok(false);
        };
        for (key, value) in patch {
            row.insert(key, value);
        }
        Ok(true)
    }

    async fn soft_delete(&mut self, table: &str, id: Uuid) -> AppResult<bool> {
        self.consume_write()?;
        let now = serde_json::to_value(Utc::now())?;
        let Some(row) = self.working.get_mut(table).and_then(|t| t.get_mut(&id)) else {
            return Ok(false);
        };
        if !field(row, DELETED_AT).is_null() {
            return Ok(false);
        }
        row.insert(DELETED_AT.to_string(), now.clone());
        row.insert("updated_at".to_string(), now);
        Ok(true)
    }

    async fn delete_where(&mut self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        self.consume_write()?;
        let Some(rows) = self.working.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|_, r| !matches_all(r, filters));
        Ok((before - rows.len()) as u64)
    }

    async fn lock_owner(&mut self, _owner: Uuid) -> AppResult<()> {
        // Every memory transaction already holds the global lock.
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTx {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

fn record_id(table: &str, row: &Record) -> AppResult<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::internal(format!("Row for table '{table}' has no valid id")))
}

fn field<'a>(record: &'a Record, name: &str) -> &'a Value {
    record.get(name).unwrap_or(&NULL)
}

fn matches_all(record: &Record, filters: &[FilterField]) -> bool {
    filters.iter().all(|f| matches(record, f))
}

/// Evaluate one filter against a record.
fn matches(record: &Record, filter: &FilterField) -> bool {
    let value = field(record, &filter.field);
    match filter.op {
        FilterOp::Eq => *value == filter.value.to_json(),
        FilterOp::Ne => *value != filter.value.to_json(),
        FilterOp::Contains => match (value, &filter.value) {
            (Value::String(haystack), FilterValue::String(needle)) => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => false,
        },
        FilterOp::HasElement => match (value, &filter.value) {
            (Value::Array(items), FilterValue::String(s)) => {
                items.iter().any(|item| item.as_str() == Some(s.as_str()))
            }
            _ => false,
        },
        FilterOp::IsNull => value.is_null(),
        FilterOp::IsNotNull => !value.is_null(),
    }
}

/// Total order over JSON scalars used for sorting. Nulls sort first;
/// RFC 3339 strings compare as instants.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizhub_core::types::SortField;
    use serde_json::json;

    fn row(id: Uuid, fields: Value) -> Record {
        let mut record = match fields {
            Value::Object(map) => map,
            _ => Record::new(),
        };
        record.insert("id".to_string(), json!(id.to_string()));
        record
    }

    async fn seed(store: &MemoryStore, rows: Vec<Record>) {
        let mut tx = store.begin().await.unwrap();
        for r in rows {
            tx.insert("items", r).await.unwrap();
        }
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        let mut tx = store.begin().await.unwrap();
        tx.insert("items", row(id, json!({"name": "a"}))).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let found = tx.get("items", id).await.unwrap().unwrap();
        assert_eq!(found["name"], json!("a"));
    }

    #[tokio::test]
    async fn test_rollback_and_drop_discard_writes() {
        let store = MemoryStore::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let mut tx = store.begin().await.unwrap();
        tx.insert("items", row(first, json!({}))).await.unwrap();
        tx.rollback().await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert("items", row(second, json!({}))).await.unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        assert!(tx.get("items", first).await.unwrap().is_none());
        assert!(tx.get("items", second).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let mut tx = store.begin().await.unwrap();
        tx.insert("items", row(id, json!({}))).await.unwrap();
        let err = tx.insert("items", row(id, json!({}))).await.unwrap_err();
        assert!(err.is(quizhub_core::error::ErrorKind::Database));
    }

    #[tokio::test]
    async fn test_filters() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        seed(
            &store,
            vec![
                row(
                    Uuid::new_v4(),
                    json!({"owner_id": owner.to_string(), "name": "Algebra Basics",
                           "tags": ["math", "intro"], "parent_id": null}),
                ),
                row(
                    Uuid::new_v4(),
                    json!({"owner_id": owner.to_string(), "name": "Geometry",
                           "tags": ["math"], "parent_id": Uuid::new_v4().to_string()}),
                ),
                row(
                    Uuid::new_v4(),
                    json!({"owner_id": Uuid::new_v4().to_string(), "name": "History",
                           "tags": [], "parent_id": null}),
                ),
            ],
        )
        .await;

        let mut tx = store.begin().await.unwrap();
        let by_owner = Query::filtered(vec![FilterField::eq("owner_id", owner)]);
        assert_eq!(tx.find("items", &by_owner).await.unwrap().len(), 2);

        let top = by_owner.clone().and(FilterField::is_null("parent_id"));
        assert_eq!(tx.find("items", &top).await.unwrap().len(), 1);

        let text = Query::filtered(vec![FilterField::contains("name", "ALGEBRA")]);
        assert_eq!(tx.find("items", &text).await.unwrap().len(), 1);

        let tagged = Query::filtered(vec![FilterField::has_element("tags", "math")]);
        assert_eq!(tx.find("items", &tagged).await.unwrap().len(), 2);

        let missing_field = [FilterField::ne("color", "red")];
        assert_eq!(tx.count("items", &missing_field).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_order_and_window() {
        let store = MemoryStore::new();
        seed(
            &store,
            ["c", "a", "d", "b"]
                .iter()
                .map(|n| row(Uuid::new_v4(), json!({"name": n})))
                .collect(),
        )
        .await;

        let mut tx = store.begin().await.unwrap();
        let names = |rows: Vec<Record>| -> Vec<String> {
            rows.iter()
                .map(|r| r["name"].as_str().unwrap().to_string())
                .collect()
        };

        let asc = Query::all().order(SortField::asc("name"));
        assert_eq!(names(tx.find("items", &asc).await.unwrap()), ["a", "b", "c", "d"]);

        let page = Query::all().order(SortField::desc("name")).window(2, 1);
        assert_eq!(names(tx.find("items", &page).await.unwrap()), ["c", "b"]);
    }

    #[test]
    fn test_timestamps_order_as_instants() {
        let a = json!("2026-01-01T00:00:00.5Z");
        let b = json!("2026-01-01T00:00:00Z");
        assert_eq!(compare_values(&a, &b), Ordering::Greater);
    }

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        seed(&store, vec![row(id, json!({"name": "a", "color": "red"}))]).await;

        let mut tx = store.begin().await.unwrap();
        let mut patch = Record::new();
        patch.insert("name".to_string(), json!("b"));
        assert!(tx.update("items", id, patch.clone()).await.unwrap());
        assert!(!tx.update("items", Uuid::new_v4(), patch).await.unwrap());

        let found = tx.get("items", id).await.unwrap().unwrap();
        assert_eq!(found["name"], json!("b"));
        assert_eq!(found["color"], json!("red"));
    }

    #[tokio::test]
    async fn test_soft_delete_only_once() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        seed(&store, vec![row(id, json!({"deleted_at": null}))]).await;

        let mut tx = store.begin().await.unwrap();
        assert!(tx.soft_delete("items", id).await.unwrap());
        assert!(!tx.soft_delete("items", id).await.unwrap());
        let found = tx.get("items", id).await.unwrap().unwrap();
        assert!(!found["deleted_at"].is_null());
    }

    #[tokio::test]
    async fn test_delete_where_removes_matches() {
        let store = MemoryStore::new();
        let quiz = Uuid::new_v4();
        seed(
            &store,
            vec![
                row(Uuid::new_v4(), json!({"quiz_id": quiz.to_string()})),
                row(Uuid::new_v4(), json!({"quiz_id": quiz.to_string()})),
                row(Uuid::new_v4(), json!({"quiz_id": Uuid::new_v4().to_string()})),
            ],
        )
        .await;

        let mut tx = store.begin().await.unwrap();
        let removed = tx
            .delete_where("items", &[FilterField::eq("quiz_id", quiz)])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(tx.count("items", &[]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let store = MemoryStore::new();
        store.fail_writes_after(1);

        let mut tx = store.begin().await.unwrap();
        tx.insert("items", row(Uuid::new_v4(), json!({}))).await.unwrap();
        assert!(tx.insert("items", row(Uuid::new_v4(), json!({}))).await.is_err());
        tx.rollback().await.unwrap();

        store.clear_write_failures();
        let mut tx = store.begin().await.unwrap();
        tx.insert("items", row(Uuid::new_v4(), json!({}))).await.unwrap();
    }
}
