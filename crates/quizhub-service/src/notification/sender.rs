//! Notification sender trait and the default log-only sender.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use quizhub_core::result::AppResult;
use quizhub_core::types::{QuizId, UserId};
use quizhub_entity::collaborator::CollaboratorPermission;

/// Everything a recipient needs to open a shared quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareNotification {
    /// Recipient address.
    pub recipient_email: String,
    /// Sharing user.
    pub sender_id: UserId,
    /// Sharing user's display name, if known.
    pub sender_name: Option<String>,
    /// Shared quiz.
    pub quiz_id: QuizId,
    /// Shared quiz title.
    pub quiz_title: String,
    /// Share token for the link.
    pub share_token: String,
    /// Offered permission.
    pub permission: CollaboratorPermission,
    /// Optional personal note.
    pub message: Option<String>,
}

/// Delivers share notifications. A failure never aborts the share.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver one notification.
    async fn send_share_notification(&self, notification: &ShareNotification) -> AppResult<()>;
}

/// Emits a structured log line instead of sending mail.
#[derive(Debug, Clone, Default)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send_share_notification(&self, notification: &ShareNotification) -> AppResult<()> {
        info!(
            recipient = %notification.recipient_email,
            sender_id = %notification.sender_id,
            quiz_id = %notification.quiz_id,
            permission = %notification.permission,
            "Share notification"
        );
        Ok(())
    }
}
