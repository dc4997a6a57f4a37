//! Predicate types for store queries.
//!
//! A query's filters form a conjunction: a record matches when every
//! [`FilterField`] matches. Field names address top-level record fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sorting::SortField;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal (a missing/null field counts as not equal).
    Ne,
    /// Case-insensitive substring match on a string field.
    Contains,
    /// The field is an array containing the given string.
    HasElement,
    /// The field is missing or null.
    IsNull,
    /// The field is present and not null.
    IsNotNull,
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value (UUIDs and enum tags are compared as strings).
    String(String),
    /// An integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
    /// No value (for `IsNull`, `IsNotNull`).
    Null,
}

impl FilterValue {
    /// The JSON value a record field must hold to compare equal.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Null => serde_json::Value::Null,
        }
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The record field to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value.into())
    }

    /// Shorthand for an inequality filter.
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Ne, value.into())
    }

    /// Equality on an optional reference: `None` becomes `IS NULL`.
    pub fn eq_opt(field: impl Into<String>, value: Option<Uuid>) -> Self {
        match value {
            Some(id) => Self::eq(field, id),
            None => Self::is_null(field),
        }
    }

    /// Case-insensitive substring filter.
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Contains, FilterValue::String(needle.into()))
    }

    /// Array-membership filter.
    pub fn has_element(field: impl Into<String>, element: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterOp::HasElement,
            FilterValue::String(element.into()),
        )
    }

    /// Null check.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, FilterValue::Null)
    }

    /// Non-null check.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNotNull, FilterValue::Null)
    }
}

/// A full `find` request: filters, optional ordering, and a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Conjunction of conditions.
    pub filters: Vec<FilterField>,
    /// Optional ordering.
    pub order_by: Option<SortField>,
    /// Maximum number of records.
    pub limit: Option<u64>,
    /// Number of matching records to skip.
    pub offset: Option<u64>,
}

impl Query {
    /// A query matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// A query with the given filters.
    pub fn filtered(filters: Vec<FilterField>) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Add a condition.
    pub fn and(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the ordering.
    pub fn order(mut self, sort: SortField) -> Self {
        self.order_by = Some(sort);
        self
    }

    /// Set a limit/offset window.
    pub fn window(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}
