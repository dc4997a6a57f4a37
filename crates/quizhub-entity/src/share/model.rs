//! Quiz share model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizhub_core::traits::Entity;
use quizhub_core::types::{QuizId, ShareId, UserId};

use crate::collaborator::CollaboratorPermission;

/// A quiz shared with one recipient, addressed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizShare {
    /// Unique share identifier.
    pub id: ShareId,
    /// The shared quiz.
    pub quiz_id: QuizId,
    /// User who created the share.
    pub shared_by: UserId,
    /// Resolved (or provisioned) recipient.
    pub recipient_id: UserId,
    /// Email the share was addressed to.
    pub recipient_email: String,
    /// Permission level offered.
    pub permission: CollaboratorPermission,
    /// Random token identifying the share in notification links.
    pub token: String,
    /// Optional personal note.
    pub message: Option<String>,
    /// Whether the share is currently active.
    pub is_active: bool,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl Entity for QuizShare {
    const TABLE: &'static str = "quiz_shares";
    const SOFT_DELETE: bool = false;

    fn key(&self) -> Uuid {
        self.id.0
    }
}
