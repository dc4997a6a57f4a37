//! PostgreSQL store backend.
//!
//! Every entity is one JSONB document in the `records` table, keyed by
//! `(collection, id)`. Filters address top-level document fields; field
//! names are always bound as parameters, never spliced into SQL.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Transaction};
use uuid::Uuid;

use quizhub_core::error::{AppError, ErrorKind};
use quizhub_core::result::AppResult;
use quizhub_core::traits::entity::DELETED_AT;
use quizhub_core::traits::{Record, Store, StoreTx};
use quizhub_core::types::{FilterField, FilterOp, FilterValue, Query, SortField};

/// Store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn get(&mut self, table: &str, id: Uuid) -> AppResult<Option<Record>> {
        sqlx::query_scalar::<_, Json<Record>>(
            "SELECT data FROM records WHERE collection = $1 AND id = $2",
        )
        .bind(table)
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map(|row| row.map(|Json(data)| data))
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch record", e))
    }

    async fn find(&mut self, table: &str, query: &Query) -> AppResult<Vec<Record>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT data FROM records WHERE collection = ");
        qb.push_bind(table.to_string());
        push_filters(&mut qb, &query.filters);

        if let Some(sort) = &query.order_by {
            push_order(&mut qb, sort);
        }
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit as i64);
        }
        if let Some(offset) = query.offset {
            qb.push(" OFFSET ");
            qb.push_bind(offset as i64);
        }

        qb.build_query_scalar::<Json<Record>>()
            .fetch_all(&mut *self.tx)
            .await
            .map(|rows| rows.into_iter().map(|Json(data)| data).collect())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to query records", e))
    }

    async fn count(&mut self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM records WHERE collection = ");
        qb.push_bind(table.to_string());
        push_filters(&mut qb, filters);

        qb.build_query_scalar::<i64>()
            .fetch_one(&mut *self.tx)
            .await
            .map(|n| n as u64)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count records", e))
    }

    async fn insert(&mut self, table: &str, row: Record) -> AppResult<Uuid> {
        let id = row
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| {
                AppError::internal(format!("Row for table '{table}' has no valid id"))
            })?;

        sqlx::query("INSERT INTO records (collection, id, data) VALUES ($1, $2, $3)")
            .bind(table)
            .bind(id)
            .bind(Json(&row))
            .execute(&mut *self.tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::with_source(
                        ErrorKind::Database,
                        format!("Duplicate key {id} in table '{table}'"),
                        e,
                    )
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to insert record", e),
            })?;
        Ok(id)
    }

    async fn update(&mut self, table: &str, id: Uuid, patch: Record) -> AppResult<bool> {
        sqlx::query(
            "UPDATE records SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(table)
        .bind(id)
        .bind(Json(&patch))
        .execute(&mut *self.tx)
        .await
        .map(|r| r.rows_affected() > 0)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update record", e))
    }

    async fn soft_delete(&mut self, table: &str, id: Uuid) -> AppResult<bool> {
        let now = serde_json::to_value(Utc::now())?;
        let mut patch = Record::new();
        patch.insert(DELETED_AT.to_string(), now.clone());
        patch.insert("updated_at".to_string(), now);

        sqlx::query(
            "UPDATE records SET data = data || $3 \
             WHERE collection = $1 AND id = $2 \
             AND COALESCE(data -> 'deleted_at', 'null'::jsonb) = 'null'::jsonb",
        )
        .bind(table)
        .bind(id)
        .bind(Json(&patch))
        .execute(&mut *self.tx)
        .await
        .map(|r| r.rows_affected() > 0)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to soft-delete record", e))
    }

    async fn delete_where(&mut self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM records WHERE collection = ");
        qb.push_bind(table.to_string());
        push_filters(&mut qb, filters);

        qb.build()
            .execute(&mut *self.tx)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete records", e))
    }

    async fn lock_owner(&mut self, owner: Uuid) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(owner.to_string())
            .execute(&mut *self.tx)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock owner", e))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit", e))
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to roll back", e))
    }
}

/// Timestamp fields are stored as RFC 3339 strings with a variable number
/// of fractional digits, so they only order correctly as `timestamptz`.
fn is_timestamp_field(field: &str) -> bool {
    field.ends_with("_at")
}

/// Append the `ORDER BY` clause, with `id` as tie-breaker.
fn push_order(qb: &mut QueryBuilder<'_, Postgres>, sort: &SortField) {
    if is_timestamp_field(&sort.field) {
        qb.push(" ORDER BY (data ->> ");
        qb.push_bind(sort.field.clone());
        qb.push(")::timestamptz ");
    } else {
        qb.push(" ORDER BY data -> ");
        qb.push_bind(sort.field.clone());
        qb.push(" ");
    }
    qb.push(sort.direction.as_sql());
    qb.push(", id");
}

/// Append one `AND <condition>` per filter.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &[FilterField]) {
    for filter in filters {
        qb.push(" AND ");
        let field = filter.field.clone();
        match (filter.op, &filter.value) {
            (FilterOp::IsNull, _) | (FilterOp::Eq, FilterValue::Null) => {
                qb.push("COALESCE(data -> ");
                qb.push_bind(field);
                qb.push(", 'null'::jsonb) = 'null'::jsonb");
            }
            (FilterOp::IsNotNull, _) | (FilterOp::Ne, FilterValue::Null) => {
                qb.push("COALESCE(data -> ");
                qb.push_bind(field);
                qb.push(", 'null'::jsonb) <> 'null'::jsonb");
            }
            (FilterOp::Eq, value) => {
                qb.push("data -> ");
                qb.push_bind(field);
                qb.push(" = ");
                qb.push_bind(Json(value.to_json()));
            }
            (FilterOp::Ne, value) => {
                qb.push("data -> ");
                qb.push_bind(field);
                qb.push(" IS DISTINCT FROM ");
                qb.push_bind(Json(value.to_json()));
            }
            (FilterOp::Contains, FilterValue::String(needle)) => {
                qb.push("strpos(lower(COALESCE(data ->> ");
                qb.push_bind(field);
                qb.push(", '')), lower(");
                qb.push_bind(needle.clone());
                qb.push(")) > 0");
            }
            (FilterOp::HasElement, FilterValue::String(element)) => {
                qb.push("jsonb_typeof(data -> ");
                qb.push_bind(field.clone());
                qb.push(") = 'array' AND data -> ");
                qb.push_bind(field);
                qb.push(" @> ");
                qb.push_bind(Json(Value::Array(vec![Value::String(element.clone())])));
            }
            // Operator/value combinations that can never match.
            _ => {
                qb.push("FALSE");
            }
        }
    }
}
