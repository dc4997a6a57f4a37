//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizhub_core::traits::Entity;
use quizhub_core::types::{FolderId, UserId};

/// A folder in an owner's quiz hierarchy.
///
/// Depth is never stored; it is recomputed from `parent_id` links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The folder owner.
    pub owner_id: UserId,
    /// Parent folder ID (None for top-level folders).
    pub parent_id: Option<FolderId>,
    /// Trimmed folder name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Display color hint.
    pub color: Option<String>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Folder {
    /// Build a new live folder.
    pub fn new(
        owner_id: UserId,
        parent_id: Option<FolderId>,
        name: impl Into<String>,
        description: Option<String>,
        color: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: FolderId::new(),
            owner_id,
            parent_id,
            name: name.into(),
            description,
            color,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Check if this is a top-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this folder has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Entity for Folder {
    const TABLE: &'static str = "folders";

    fn key(&self) -> Uuid {
        self.id.0
    }
}
