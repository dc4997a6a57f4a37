//! Batched quiz operations with per-item results.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use quizhub_core::config::LimitsConfig;
use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::types::{FolderId, QuizId};

use super::service::{QuizService, UpdateQuizRequest};
use crate::activity::{ActivityLogger, actions};
use crate::context::RequestContext;

/// Action applied to every quiz of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    /// Delete each quiz.
    Delete,
    /// Move each quiz to `data.folder_id`.
    Move,
    /// Set each quiz's category.
    UpdateCategory,
    /// Replace each quiz's tags.
    UpdateTags,
}

impl BulkAction {
    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Move => "move",
            Self::UpdateCategory => "update_category",
            Self::UpdateTags => "update_tags",
        }
    }
}

/// Parameters shared by every item of a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkData {
    /// Target folder for `move` (None for top level).
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Category for `update_category` (None or blank clears it).
    #[serde(default)]
    pub category: Option<String>,
    /// Tags for `update_tags`.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Delete permanently instead of soft-deleting.
    #[serde(default)]
    pub permanent: bool,
}

/// A batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkOperationRequest {
    /// What to do.
    pub action: BulkAction,
    /// Quizzes to apply it to.
    pub quiz_ids: Vec<QuizId>,
    /// Action parameters.
    #[serde(default)]
    pub data: BulkData,
}

/// Outcome for one quiz of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemResult {
    /// The quiz.
    pub quiz_id: QuizId,
    /// Whether the action succeeded.
    pub success: bool,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate batch outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkOperationResult {
    /// The applied action.
    pub action: BulkAction,
    /// Per-quiz outcomes in request order.
    pub results: Vec<BulkItemResult>,
    /// Number of successes.
    pub succeeded: usize,
    /// Number of failures.
    pub failed: usize,
}

/// Runs batches by composing the single-quiz operations.
#[derive(Clone)]
pub struct BulkService {
    /// Single-quiz operations.
    quizzes: QuizService,
    /// Size limits.
    limits: LimitsConfig,
    /// Activity sink.
    activity: Arc<dyn ActivityLogger>,
}

impl BulkService {
    /// Creates a new bulk service.
    pub fn new(quizzes: QuizService, limits: LimitsConfig, activity: Arc<dyn ActivityLogger>) -> Self {
        Self {
            quizzes,
            limits,
            activity,
        }
    }

    /// Applies one action to each quiz independently.
    ///
    /// Every item commits on its own; a failing item is reported and the
    /// batch continues. One summary activity entry is written at the end.
    pub async fn bulk_operation(
        &self,
        ctx: &RequestContext,
        req: BulkOperationRequest,
    ) -> AppResult<BulkOperationResult> {
        if req.quiz_ids.is_empty() {
            return Err(AppError::validation("quiz_ids cannot be empty"));
        }
        if req.quiz_ids.len() > self.limits.max_bulk_items {
            return Err(AppError::validation(format!(
                "Cannot process more than {} quizzes at once",
                self.limits.max_bulk_items
            )));
        }
        if req.action == BulkAction::UpdateTags && req.data.tags.is_none() {
            return Err(AppError::validation("update_tags requires data.tags"));
        }

        let mut results = Vec::with_capacity(req.quiz_ids.len());
        for &quiz_id in &req.quiz_ids {
            let outcome = self.apply(ctx, req.action, quiz_id, &req.data).await;
            results.push(BulkItemResult {
                quiz_id,
                success: outcome.is_ok(),
                error: outcome.err().map(|e| e.message),
            });
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;

        info!(
            user_id = %ctx.user_id,
            action = req.action.as_str(),
            succeeded,
            failed,
            "Bulk operation finished"
        );
        self.activity
            .record(
                ctx.user_id,
                &actions::bulk(req.action.as_str()),
                None,
                json!({
                    "quiz_ids": req.quiz_ids,
                    "succeeded": succeeded,
                    "failed": failed,
                }),
            )
            .await;

        Ok(BulkOperationResult {
            action: req.action,
            results,
            succeeded,
            failed,
        })
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        action: BulkAction,
        quiz_id: QuizId,
        data: &BulkData,
    ) -> AppResult<()> {
        match action {
            BulkAction::Delete => self.quizzes.delete_quiz(ctx, quiz_id, data.permanent).await,
            BulkAction::Move => self
                .quizzes
                .move_quiz(ctx, quiz_id, data.folder_id)
                .await
                .map(|_| ()),
            BulkAction::UpdateCategory => {
                let req = UpdateQuizRequest {
                    category: Some(data.category.clone().unwrap_or_default()),
                    ..Default::default()
                };
                self.quizzes.update_quiz(ctx, quiz_id, req).await.map(|_| ())
            }
            BulkAction::UpdateTags => {
                let req = UpdateQuizRequest {
                    tags: Some(data.tags.clone().unwrap_or_default()),
                    ..Default::default()
                };
                self.quizzes.update_quiz(ctx, quiz_id, req).await.map(|_| ())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizhub_core::error::ErrorKind;

    use crate::testing::Fixture;

    fn request(action: BulkAction, quiz_ids: Vec<QuizId>, data: BulkData) -> BulkOperationRequest {
        BulkOperationRequest {
            action,
            quiz_ids,
            data,
        }
    }

    #[tokio::test]
    async fn test_bulk_move_reports_each_item() {
        let fx = Fixture::new();
        let u1 = fx.user("u1@example.com").await;
        let u2 = fx.user("u2@example.com").await;
        let folder = fx.folder(&u1, "Unit 1", None).await;
        let a = fx.quiz(&u1, "A", None).await;
        let b = fx.quiz(&u1, "B", None).await;
        let foreign = fx.quiz(&u2, "Not mine", None).await;
        let missing = QuizId::new();

        let data = BulkData {
            folder_id: Some(folder.id),
            ..Default::default()
        };
        let result = fx
            .bulk
            .bulk_operation(
                &u1,
                request(BulkAction::Move, vec![a.id, foreign.id, missing, b.id], data),
            )
            .await
            .unwrap();

        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 2);
        assert!(result.results[0].success);
        assert!(!result.results[1].success);
        assert!(result.results[2].error.is_some());
        assert!(result.results[3].success);

        assert_eq!(fx.reload_quiz(&a).await.unwrap().folder_id, Some(folder.id));
        assert_eq!(fx.reload_quiz(&foreign).await.unwrap().folder_id, None);

        let entries = fx.activity(u1.user_id).await;
        assert_eq!(
            entries.iter().filter(|e| e.action == "quiz.bulk_move").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_bulk_update_tags_and_category() {
        let fx = Fixture::new();
        let u1 = fx.user("u1@example.com").await;
        let a = fx.quiz(&u1, "A", None).await;
        let b = fx.quiz(&u1, "B", None).await;

        let data = BulkData {
            tags: Some(vec!["review".into(), "final".into()]),
            ..Default::default()
        };
        fx.bulk
            .bulk_operation(&u1, request(BulkAction::UpdateTags, vec![a.id, b.id], data))
            .await
            .unwrap();
        assert_eq!(fx.reload_quiz(&b).await.unwrap().tags, vec!["final", "review"]);

        let data = BulkData {
            category: Some("Math".into()),
            ..Default::default()
        };
        let result = fx
            .bulk
            .bulk_operation(&u1, request(BulkAction::UpdateCategory, vec![a.id], data))
            .await
            .unwrap();
        assert_eq!(result.succeeded, 1);
        assert_eq!(fx.reload_quiz(&a).await.unwrap().category.as_deref(), Some("Math"));
    }

    #[tokio::test]
    async fn test_bulk_delete_continues_past_failures() {
        let fx = Fixture::new();
        let u1 = fx.user("u1@example.com").await;
        let a = fx.quiz(&u1, "A", None).await;
        let b = fx.quiz(&u1, "B", None).await;

        let result = fx
            .bulk
            .bulk_operation(
                &u1,
                request(BulkAction::Delete, vec![a.id, a.id, b.id], BulkData::default()),
            )
            .await
            .unwrap();
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert!(fx.reload_quiz(&b).await.unwrap().is_deleted());
    }

    #[tokio::test]
    async fn test_bulk_request_validation() {
        let limits = LimitsConfig {
            max_bulk_items: 2,
            ..LimitsConfig::default()
        };
        let fx = Fixture::with_limits(limits);
        let u1 = fx.user("u1@example.com").await;

        let err = fx
            .bulk
            .bulk_operation(&u1, request(BulkAction::Delete, vec![], BulkData::default()))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let ids = vec![QuizId::new(), QuizId::new(), QuizId::new()];
        let err = fx
            .bulk
            .bulk_operation(&u1, request(BulkAction::Delete, ids, BulkData::default()))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let err = fx
            .bulk
            .bulk_operation(
                &u1,
                request(BulkAction::UpdateTags, vec![QuizId::new()], BulkData::default()),
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[test]
    fn test_action_names() {
        let action: BulkAction = serde_json::from_str("\"update_category\"").unwrap();
        assert_eq!(action, BulkAction::UpdateCategory);
        assert_eq!(actions::bulk(action.as_str()), "quiz.bulk_update_category");
    }
}
