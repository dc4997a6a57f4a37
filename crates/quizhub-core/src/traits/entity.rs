//! Table-mapping contract for domain entities.

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Field name of the soft-delete marker shared by all soft-deletable tables.
pub const DELETED_AT: &str = "deleted_at";

/// A domain entity stored as one row of a named table.
///
/// The serialized form of the entity is the row: every top-level field
/// becomes a record field that filters and patches can address.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Table (collection) name.
    const TABLE: &'static str;

    /// Whether rows carry a `deleted_at` marker that hides them from
    /// live lookups.
    const SOFT_DELETE: bool = true;

    /// Primary key.
    fn key(&self) -> Uuid;
}
