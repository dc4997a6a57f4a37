//! Collaborator grant model and permission levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use quizhub_core::traits::Entity;
use quizhub_core::types::{GrantId, QuizId, UserId};

/// Permission carried by a collaborator grant.
///
/// Ordered by privilege: Admin > Edit > View.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorPermission {
    /// Read-only access.
    View,
    /// Can edit content and metadata.
    Edit,
    /// Can edit, share, and manage collaborators.
    Admin,
}

impl CollaboratorPermission {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Edit => 2,
            Self::View => 1,
        }
    }

    /// Check if this permission grants at least the given level.
    pub fn has_at_least(&self, required: CollaboratorPermission) -> bool {
        self.privilege_level() >= required.privilege_level()
    }

    /// Check if this permission allows editing.
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Edit | Self::Admin)
    }

    /// Check if this permission allows sharing and collaborator management.
    pub fn can_manage(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for CollaboratorPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CollaboratorPermission {
    type Err = quizhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            "admin" => Ok(Self::Admin),
            _ => Err(quizhub_core::AppError::validation(format!(
                "Invalid permission: '{s}'. Expected one of: view, edit, admin"
            ))),
        }
    }
}

/// Whether a grant is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantStatus {
    /// The grant extends access.
    Active,
    /// The grant was revoked; the row is kept.
    Removed,
}

impl GrantStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Removed => "removed",
        }
    }
}

/// A non-owner access right on a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorGrant {
    /// Unique grant identifier.
    pub id: GrantId,
    /// The quiz the grant applies to.
    pub quiz_id: QuizId,
    /// The collaborating user.
    pub user_id: UserId,
    /// Granted permission.
    pub permission: CollaboratorPermission,
    /// Active or removed.
    pub status: GrantStatus,
    /// Who issued (or last changed) the grant.
    pub granted_by: UserId,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
    /// When the grant was last changed.
    pub updated_at: DateTime<Utc>,
}

impl CollaboratorGrant {
    /// Build a new active grant.
    pub fn new(
        quiz_id: QuizId,
        user_id: UserId,
        permission: CollaboratorPermission,
        granted_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GrantId::new(),
            quiz_id,
            user_id,
            permission,
            status: GrantStatus::Active,
            granted_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the grant currently extends access.
    pub fn is_active(&self) -> bool {
        self.status == GrantStatus::Active
    }
}

impl Entity for CollaboratorGrant {
    const TABLE: &'static str = "quiz_collaborators";
    const SOFT_DELETE: bool = false;

    fn key(&self) -> Uuid {
        self.id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(CollaboratorPermission::Admin.has_at_least(CollaboratorPermission::Edit));
        assert!(CollaboratorPermission::Edit.has_at_least(CollaboratorPermission::View));
        assert!(!CollaboratorPermission::View.has_at_least(CollaboratorPermission::Edit));
    }

    #[test]
    fn test_edit_and_manage_rights() {
        assert!(!CollaboratorPermission::View.can_edit());
        assert!(CollaboratorPermission::Edit.can_edit());
        assert!(CollaboratorPermission::Admin.can_edit());
        assert!(!CollaboratorPermission::Edit.can_manage());
        assert!(CollaboratorPermission::Admin.can_manage());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "EDIT".parse::<CollaboratorPermission>().unwrap(),
            CollaboratorPermission::Edit
        );
        assert!("owner".parse::<CollaboratorPermission>().is_err());
    }
}
