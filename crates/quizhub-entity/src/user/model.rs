//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizhub_core::traits::Entity;
use quizhub_core::types::UserId;

/// A quiz author or recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Lower-cased email address, unique among live users.
    pub email: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Whether the account was created implicitly by a share.
    #[serde(default)]
    pub provisioned: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a new user from an email address.
    pub fn new(email: &str, display_name: Option<String>, provisioned: bool) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email: normalize_email(email),
            display_name,
            provisioned,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";

    fn key(&self) -> Uuid {
        self.id.0
    }
}

/// Canonical form of an email address used for lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal structural email check: one `@`, non-empty local part, and a
/// dotted domain without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
