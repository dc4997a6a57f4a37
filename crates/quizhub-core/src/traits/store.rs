//! Generic persistent store capability.
//!
//! The services never talk SQL. They open a [`StoreTx`] on a [`Store`],
//! pass `&mut dyn StoreTx` through every nested call of one logical
//! operation, and finish with `commit` or `rollback`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::filter::{FilterField, Query};

/// One stored row: a JSON object keyed by field name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Factory for transactions.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Open a new transaction.
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>>;

    /// Check connectivity with the backing store.
    async fn health_check(&self) -> AppResult<bool>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// A unit of work against the store.
///
/// Writes become visible to other transactions only after [`commit`].
/// Dropping a transaction without committing discards its writes.
///
/// [`commit`]: StoreTx::commit
#[async_trait]
pub trait StoreTx: Send {
    /// Fetch one row by id, regardless of soft-delete state.
    async fn get(&mut self, table: &str, id: Uuid) -> AppResult<Option<Record>>;

    /// Fetch all rows matching the query.
    async fn find(&mut self, table: &str, query: &Query) -> AppResult<Vec<Record>>;

    /// Count rows matching all filters.
    async fn count(&mut self, table: &str, filters: &[FilterField]) -> AppResult<u64>;

    /// Insert a row. The row must carry its `id` field; returns that id.
    async fn insert(&mut self, table: &str, row: Record) -> AppResult<Uuid>;

    /// Merge the given top-level fields into an existing row.
    /// Returns `false` when no row has this id.
    async fn update(&mut self, table: &str, id: Uuid, patch: Record) -> AppResult<bool>;

    /// Set `deleted_at` (and `updated_at`) on a live row.
    /// Returns `false` when the row is missing or already deleted.
    async fn soft_delete(&mut self, table: &str, id: Uuid) -> AppResult<bool>;

    /// Physically remove all rows matching the filters; returns the count.
    async fn delete_where(&mut self, table: &str, filters: &[FilterField]) -> AppResult<u64>;

    /// Serialize this transaction against every other transaction that
    /// locks the same owner, until commit or rollback.
    async fn lock_owner(&mut self, owner: Uuid) -> AppResult<()>;

    /// Make all writes durable and visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard all writes.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}
