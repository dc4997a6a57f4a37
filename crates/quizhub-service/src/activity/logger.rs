//! Activity logger seam and its store-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use quizhub_core::traits::Store;
use quizhub_core::types::{QuizId, UserId};
use quizhub_database::finish;
use quizhub_database::repositories::ActivityRepository;
use quizhub_entity::activity::ActivityLogEntry;

/// Dotted action names written to the activity log.
pub mod actions {
    /// A quiz was created.
    pub const QUIZ_CREATED: &str = "quiz.created";
    /// A quiz was updated.
    pub const QUIZ_UPDATED: &str = "quiz.updated";
    /// A quiz was deleted (soft or permanent).
    pub const QUIZ_DELETED: &str = "quiz.deleted";
    /// A quiz was moved between folders.
    pub const QUIZ_MOVED: &str = "quiz.moved";
    /// A quiz was duplicated.
    pub const QUIZ_DUPLICATED: &str = "quiz.duplicated";
    /// A quiz was shared.
    pub const QUIZ_SHARED: &str = "quiz.shared";
    /// A collaborator was added or changed.
    pub const COLLABORATOR_ADDED: &str = "quiz.collaborator_added";
    /// A collaborator was removed.
    pub const COLLABORATOR_REMOVED: &str = "quiz.collaborator_removed";
    /// A folder was deleted.
    pub const FOLDER_DELETED: &str = "folder.deleted";

    /// Action name of a bulk operation.
    pub fn bulk(action: &str) -> String {
        format!("quiz.bulk_{action}")
    }
}

/// Records user activity. Implementations swallow their own failures.
#[async_trait]
pub trait ActivityLogger: Send + Sync {
    /// Record one action.
    async fn record(
        &self,
        owner: UserId,
        action: &str,
        quiz: Option<QuizId>,
        details: serde_json::Value,
    );
}

/// Writes each entry in its own store transaction.
#[derive(Clone)]
pub struct StoreActivityLogger {
    store: Arc<dyn Store>,
}

impl StoreActivityLogger {
    /// Creates a new store-backed logger.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActivityLogger for StoreActivityLogger {
    async fn record(
        &self,
        owner: UserId,
        action: &str,
        quiz: Option<QuizId>,
        details: serde_json::Value,
    ) {
        let entry = ActivityLogEntry::new(owner, action, quiz, details);
        let result = match self.store.begin().await {
            Ok(mut tx) => {
                let result = ActivityRepository::create(tx.as_mut(), &entry).await;
                finish(tx, result).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => debug!(user_id = %owner, action, "Activity recorded"),
            Err(e) => warn!(user_id = %owner, action, error = %e, "Failed to record activity"),
        }
    }
}
