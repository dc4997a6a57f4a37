//! Quiz entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizhub_core::traits::Entity;
use quizhub_core::types::{FolderId, QuizId, UserId};

use super::question::Question;
use super::status::{Difficulty, QuizStatus};

/// A quiz owned by one user, optionally filed in one of their folders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique quiz identifier.
    pub id: QuizId,
    /// The quiz owner.
    pub owner_id: UserId,
    /// Trimmed title, unique among the owner's live quizzes.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Ordered questions.
    pub questions: Vec<Question>,
    /// Containing folder (None = top level).
    pub folder_id: Option<FolderId>,
    /// Tags, kept trimmed, deduplicated, and sorted.
    pub tags: Vec<String>,
    /// Subject category.
    pub category: Option<String>,
    /// Readable by everyone when set.
    pub is_public: bool,
    /// Lifecycle status.
    pub status: QuizStatus,
    /// Derived estimate of completion time in minutes.
    pub estimated_time_minutes: u32,
    /// Derived difficulty.
    pub difficulty: Difficulty,
    /// When the quiz was created.
    pub created_at: DateTime<Utc>,
    /// When the quiz was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the quiz was last opened.
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Quiz {
    /// Check if this quiz has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the given user owns this quiz.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Normalize a tag list into set form: trimmed, non-empty, deduplicated,
/// sorted.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = tags
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

impl Entity for Quiz {
    const TABLE: &'static str = "quizzes";

    fn key(&self) -> Uuid {
        self.id.0
    }
}
