//! Quiz view records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizhub_core::traits::Entity;
use quizhub_core::types::{QuizId, UserId, ViewId};

/// One opening of a quiz by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizView {
    /// Unique view identifier.
    pub id: ViewId,
    /// The quiz that was opened.
    pub quiz_id: QuizId,
    /// Who opened it.
    pub viewer_id: UserId,
    /// When it was opened.
    pub viewed_at: DateTime<Utc>,
}

impl QuizView {
    /// Record a view happening now.
    pub fn now(quiz_id: QuizId, viewer_id: UserId) -> Self {
        Self {
            id: ViewId::new(),
            quiz_id,
            viewer_id,
            viewed_at: Utc::now(),
        }
    }
}

impl Entity for QuizView {
    const TABLE: &'static str = "quiz_views";
    const SOFT_DELETE: bool = false;

    fn key(&self) -> Uuid {
        self.id.0
    }
}
