//! Activity log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizhub_core::traits::Entity;
use quizhub_core::types::{ActivityId, QuizId, UserId};

/// An immutable record of something a user did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Unique entry identifier.
    pub id: ActivityId,
    /// The user who performed the action.
    pub owner_id: UserId,
    /// The action that was performed (e.g., `"quiz.created"`).
    pub action: String,
    /// The quiz involved, if any.
    pub quiz_id: Option<QuizId>,
    /// Additional details about the action.
    pub details: serde_json::Value,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Build an entry stamped now.
    pub fn new(
        owner_id: UserId,
        action: impl Into<String>,
        quiz_id: Option<QuizId>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            owner_id,
            action: action.into(),
            quiz_id,
            details,
            created_at: Utc::now(),
        }
    }
}

impl Entity for ActivityLogEntry {
    const TABLE: &'static str = "activity_log";
    const SOFT_DELETE: bool = false;

    fn key(&self) -> Uuid {
        self.id.0
    }
}
