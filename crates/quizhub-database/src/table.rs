//! Typed access to one entity table over a [`StoreTx`].
//!
//! Every lookup through [`EntityTable`] hides soft-deleted rows when the
//! entity declares soft-delete support; callers never add that filter
//! themselves.

use std::marker::PhantomData;

use serde_json::Value;
use uuid::Uuid;

use quizhub_core::error::{AppError, ErrorKind};
use quizhub_core::result::AppResult;
use quizhub_core::traits::entity::DELETED_AT;
use quizhub_core::traits::{Entity, Record, StoreTx};
use quizhub_core::types::{FilterField, Query};

/// Generic table helper for an [`Entity`] type.
#[derive(Debug)]
pub struct EntityTable<E>(PhantomData<E>);

impl<E: Entity> EntityTable<E> {
    /// Append the live-row predicate when the entity is soft-deletable.
    pub fn live(mut filters: Vec<FilterField>) -> Vec<FilterField> {
        if E::SOFT_DELETE {
            filters.push(FilterField::is_null(DELETED_AT));
        }
        filters
    }

    /// Fetch a live row by id.
    pub async fn get(tx: &mut dyn StoreTx, id: Uuid) -> AppResult<Option<E>> {
        match tx.get(E::TABLE, id).await? {
            Some(record) if is_live::<E>(&record) => decode(record).map(Some),
            _ => Ok(None),
        }
    }

    /// Fetch a row by id, including soft-deleted ones.
    pub async fn get_any(tx: &mut dyn StoreTx, id: Uuid) -> AppResult<Option<E>> {
        match tx.get(E::TABLE, id).await? {
            Some(record) => decode(record).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch all live rows matching the query.
    pub async fn find(tx: &mut dyn StoreTx, mut query: Query) -> AppResult<Vec<E>> {
        query.filters = Self::live(query.filters);
        tx.find(E::TABLE, &query)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Fetch the first live row matching the filters.
    pub async fn find_one(tx: &mut dyn StoreTx, filters: Vec<FilterField>) -> AppResult<Option<E>> {
        let query = Query::filtered(filters).window(1, 0);
        Ok(Self::find(tx, query).await?.into_iter().next())
    }

    /// Count live rows matching the filters.
    pub async fn count(tx: &mut dyn StoreTx, filters: Vec<FilterField>) -> AppResult<u64> {
        tx.count(E::TABLE, &Self::live(filters)).await
    }

    /// Insert a new row.
    pub async fn insert(tx: &mut dyn StoreTx, entity: &E) -> AppResult<()> {
        tx.insert(E::TABLE, encode(entity)?).await?;
        Ok(())
    }

    /// Overwrite an existing row with the entity's current state.
    pub async fn save(tx: &mut dyn StoreTx, entity: &E) -> AppResult<()> {
        if tx.update(E::TABLE, entity.key(), encode(entity)?).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!(
                "Row {} not found in '{}'",
                entity.key(),
                E::TABLE
            )))
        }
    }

    /// Soft-delete a live row. Returns `false` if it was already gone.
    pub async fn soft_delete(tx: &mut dyn StoreTx, id: Uuid) -> AppResult<bool> {
        tx.soft_delete(E::TABLE, id).await
    }

    /// Physically delete every row (live or not) matching the filters.
    pub async fn purge(tx: &mut dyn StoreTx, filters: Vec<FilterField>) -> AppResult<u64> {
        tx.delete_where(E::TABLE, &filters).await
    }
}

fn is_live<E: Entity>(record: &Record) -> bool {
    !E::SOFT_DELETE || record.get(DELETED_AT).is_none_or(Value::is_null)
}

/// Serialize an entity into a store row.
pub fn encode<E: Entity>(entity: &E) -> AppResult<Record> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::internal(format!(
            "Entity for '{}' did not serialize to an object",
            E::TABLE
        ))),
    }
}

/// Deserialize a store row into an entity.
pub fn decode<E: Entity>(record: Record) -> AppResult<E> {
    serde_json::from_value(Value::Object(record)).map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Corrupt row in '{}': {e}", E::TABLE),
            e,
        )
    })
}
