//! Sharing quizzes with recipients addressed by email.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use quizhub_core::config::LimitsConfig;
use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::{Store, StoreTx};
use quizhub_core::types::{QuizId, ShareId, UserId};
use quizhub_database::finish;
use quizhub_database::repositories::{ShareRepository, UserRepository};
use quizhub_entity::collaborator::CollaboratorPermission;
use quizhub_entity::quiz::Quiz;
use quizhub_entity::share::QuizShare;
use quizhub_entity::user::User;
use quizhub_entity::user::model::{is_valid_email, normalize_email};

use super::collaborators::upsert_grant;
use super::link;
use crate::access::QuizAccess;
use crate::access::service::require;
use crate::activity::{ActivityLogger, actions};
use crate::context::RequestContext;
use crate::notification::{NotificationSender, ShareNotification};

/// Request to share a quiz with one or more recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareQuizRequest {
    /// Recipient email addresses.
    pub emails: Vec<String>,
    /// Permission offered to every recipient.
    #[serde(default = "default_permission")]
    pub permission: CollaboratorPermission,
    /// Optional note included in the notification.
    #[serde(default)]
    pub message: Option<String>,
}

fn default_permission() -> CollaboratorPermission {
    CollaboratorPermission::View
}

/// Outcome for one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRecipientResult {
    /// Address as given in the request.
    pub email: String,
    /// Whether the share was issued.
    pub success: bool,
    /// Resolved recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Issued share record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_id: Option<ShareId>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of a share request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareQuizResult {
    /// The shared quiz.
    pub quiz_id: QuizId,
    /// Per-recipient outcomes in request order.
    pub results: Vec<ShareRecipientResult>,
    /// Recipients that were shared with.
    pub shared_count: usize,
    /// Recipients that failed.
    pub failed_count: usize,
}

/// Issues shares, grants, and notifications.
#[derive(Clone)]
pub struct ShareService {
    /// Backing store.
    store: Arc<dyn Store>,
    /// Size limits.
    limits: LimitsConfig,
    /// Notification channel.
    notifier: Arc<dyn NotificationSender>,
    /// Activity sink.
    activity: Arc<dyn ActivityLogger>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        store: Arc<dyn Store>,
        limits: LimitsConfig,
        notifier: Arc<dyn NotificationSender>,
        activity: Arc<dyn ActivityLogger>,
    ) -> Self {
        Self {
            store,
            limits,
            notifier,
            activity,
        }
    }

    /// Shares a quiz with every address in the request.
    ///
    /// Each recipient is handled in its own transaction, so one bad address
    /// does not affect the others. Notification failures are logged only.
    pub async fn share_quiz(
        &self,
        ctx: &RequestContext,
        quiz_id: QuizId,
        req: ShareQuizRequest,
    ) -> AppResult<ShareQuizResult> {
        let caller = ctx.user_id;
        if req.emails.is_empty() {
            return Err(AppError::validation("At least one recipient email is required"));
        }
        if req.emails.len() > self.limits.max_share_recipients {
            return Err(AppError::validation(format!(
                "Cannot share with more than {} recipients at once",
                self.limits.max_share_recipients
            )));
        }
        let message = req
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        let mut tx = self.store.begin().await?;
        let result: AppResult<(Quiz, Option<User>)> = async {
            let quiz = require(tx.as_mut(), quiz_id, caller, QuizAccess::Manage).await?;
            let sender = UserRepository::find_by_id(tx.as_mut(), caller).await?;
            Ok((quiz, sender))
        }
        .await;
        let (quiz, sender) = finish(tx, result).await?;
        let sender_name = sender.and_then(|u| u.display_name);

        let mut results = Vec::with_capacity(req.emails.len());
        for email in &req.emails {
            let outcome = self
                .share_with(&quiz, caller, email, req.permission, message.clone())
                .await;
            let entry = match outcome {
                Ok(share) => {
                    self.notify(&quiz, &share, caller, sender_name.clone()).await;
                    ShareRecipientResult {
                        email: email.clone(),
                        success: true,
                        user_id: Some(share.recipient_id),
                        share_id: Some(share.id),
                        error: None,
                    }
                }
                Err(e) => ShareRecipientResult {
                    email: email.clone(),
                    success: false,
                    user_id: None,
                    share_id: None,
                    error: Some(e.message),
                },
            };
            results.push(entry);
        }

        let shared_count = results.iter().filter(|r| r.success).count();
        let failed_count = results.len() - shared_count;

        info!(
            user_id = %caller,
            quiz_id = %quiz_id,
            permission = %req.permission,
            shared_count,
            failed_count,
            "Quiz shared"
        );
        if shared_count > 0 {
            self.activity
                .record(
                    caller,
                    actions::QUIZ_SHARED,
                    Some(quiz_id),
                    json!({
                        "permission": req.permission,
                        "shared_count": shared_count,
                        "failed_count": failed_count,
                    }),
                )
                .await;
        }

        Ok(ShareQuizResult {
            quiz_id,
            results,
            shared_count,
            failed_count,
        })
    }

    /// Issue one share in its own transaction.
    async fn share_with(
        &self,
        quiz: &Quiz,
        caller: UserId,
        email: &str,
        permission: CollaboratorPermission,
        message: Option<String>,
    ) -> AppResult<QuizShare> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AppError::validation(format!("Invalid email address: '{email}'")));
        }

        let mut tx = self.store.begin().await?;
        let result: AppResult<QuizShare> = async {
            let recipient = resolve_recipient(tx.as_mut(), &email).await?;
            if recipient.id == caller {
                return Err(AppError::validation("Cannot share a quiz with yourself"));
            }
            if quiz.is_owned_by(recipient.id) {
                return Err(AppError::business_logic("Recipient already owns this quiz"));
            }

            if permission != CollaboratorPermission::View {
                upsert_grant(tx.as_mut(), quiz.id, recipient.id, permission, caller).await?;
            }

            let share = QuizShare {
                id: ShareId::new(),
                quiz_id: quiz.id,
                shared_by: caller,
                recipient_id: recipient.id,
                recipient_email: recipient.email,
                permission,
                token: link::generate_token(),
                message,
                is_active: true,
                created_at: Utc::now(),
            };
            ShareRepository::create(tx.as_mut(), &share).await?;
            Ok(share)
        }
        .await;
        finish(tx, result).await
    }

    async fn notify(
        &self,
        quiz: &Quiz,
        share: &QuizShare,
        sender_id: UserId,
        sender_name: Option<String>,
    ) {
        let notification = ShareNotification {
            recipient_email: share.recipient_email.clone(),
            sender_id,
            sender_name,
            quiz_id: quiz.id,
            quiz_title: quiz.title.clone(),
            share_token: share.token.clone(),
            permission: share.permission,
            message: share.message.clone(),
        };
        if let Err(e) = self.notifier.send_share_notification(&notification).await {
            warn!(
                quiz_id = %quiz.id,
                recipient = %share.recipient_email,
                error = %e,
                "Failed to send share notification"
            );
        }
    }
}

/// Find the user with this address, provisioning one if none exists.
async fn resolve_recipient(tx: &mut dyn StoreTx, email: &str) -> AppResult<User> {
    if let Some(user) = UserRepository::find_by_email(tx, email).await? {
        return Ok(user);
    }
    let user = User::new(email, None, true);
    UserRepository::create(tx, &user).await?;
    info!(user_id = %user.id, email = %user.email, "Provisioned user for share recipient");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizhub_core::error::ErrorKind;
    use quizhub_database::repositories::CollaboratorRepository;

    use crate::testing::{FailingNotifier, Fixture};

    fn request(emails: &[&str], permission: CollaboratorPermission) -> ShareQuizRequest {
        ShareQuizRequest {
            emails: emails.iter().map(|e| e.to_string()).collect(),
            permission,
            message: Some("Please review".to_string()),
        }
    }

    #[tokio::test]
    async fn test_share_reports_per_recipient() {
        let fx = Fixture::new();
        let owner = fx.user("owner@example.com").await;
        let known = fx.user("known@example.com").await;
        let quiz = fx.quiz(&owner, "Algebra I", None).await;

        let result = fx
            .shares
            .share_quiz(
                &owner,
                quiz.id,
                request(
                    &["Known@Example.com", "new@example.com", "bogus", "owner@example.com"],
                    CollaboratorPermission::Edit,
                ),
            )
            .await
            .unwrap();

        assert_eq!(result.shared_count, 2);
        assert_eq!(result.failed_count, 2);
        assert_eq!(result.results[0].user_id, Some(known.user_id));
        assert!(result.results[1].success);
        assert!(!result.results[2].success);
        assert!(result.results[3].error.as_deref().unwrap().contains("yourself"));

        // Edit shares upgrade to a grant.
        assert!(fx.access.can_edit(quiz.id, known.user_id).await.unwrap());

        // The new address was provisioned and can register later.
        let provisioned = result.results[1].user_id.unwrap();
        assert!(fx.access.can_edit(quiz.id, provisioned).await.unwrap());
        let claimed = fx
            .users
            .register(crate::user::RegisterUserRequest {
                email: "new@example.com".to_string(),
                display_name: Some("Newcomer".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(claimed.id, provisioned);
        assert!(!claimed.provisioned);
    }

    #[tokio::test]
    async fn test_view_share_does_not_create_grant() {
        let fx = Fixture::new();
        let owner = fx.user("owner@example.com").await;
        let viewer = fx.user("viewer@example.com").await;
        let quiz = fx.quiz(&owner, "Read only", None).await;

        fx.shares
            .share_quiz(
                &owner,
                quiz.id,
                request(&["viewer@example.com"], CollaboratorPermission::View),
            )
            .await
            .unwrap();

        let mut tx = fx.store.begin().await.unwrap();
        let grant = CollaboratorRepository::find(tx.as_mut(), quiz.id, viewer.user_id)
            .await
            .unwrap();
        let shares = ShareRepository::find_by_quiz(tx.as_mut(), quiz.id).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(grant.is_none());
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].token.len(), 64);
        assert!(fx.access.can_read(quiz.id, viewer.user_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_share() {
        let fx = Fixture::with_notifier(Arc::new(FailingNotifier));
        let owner = fx.user("owner@example.com").await;
        let quiz = fx.quiz(&owner, "Algebra I", None).await;

        let result = fx
            .shares
            .share_quiz(
                &owner,
                quiz.id,
                request(&["friend@example.com"], CollaboratorPermission::View),
            )
            .await
            .unwrap();
        assert_eq!(result.shared_count, 1);
        assert_eq!(result.failed_count, 0);
    }

    #[tokio::test]
    async fn test_share_requires_manage_permission() {
        let fx = Fixture::new();
        let owner = fx.user("owner@example.com").await;
        let stranger = fx.user("stranger@example.com").await;
        let quiz = fx.quiz(&owner, "Algebra I", None).await;

        let err = fx
            .shares
            .share_quiz(
                &stranger,
                quiz.id,
                request(&["friend@example.com"], CollaboratorPermission::View),
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Unauthorized));

        let err = fx
            .shares
            .share_quiz(&owner, QuizId::new(), request(&["a@example.com"], CollaboratorPermission::View))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));

        let err = fx
            .shares
            .share_quiz(&owner, quiz.id, request(&[], CollaboratorPermission::View))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }
}
