//! Collaborator grant management.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::{Store, StoreTx};
use quizhub_core::types::{QuizId, UserId};
use quizhub_database::finish;
use quizhub_database::repositories::{CollaboratorRepository, ShareRepository, UserRepository};
use quizhub_entity::collaborator::{CollaboratorGrant, CollaboratorPermission, GrantStatus};

use crate::access::QuizAccess;
use crate::access::service::require;
use crate::activity::{ActivityLogger, actions};
use crate::context::RequestContext;

/// Request to add (or change) a collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCollaboratorRequest {
    /// The collaborating user.
    pub user_id: UserId,
    /// Permission to grant.
    pub permission: CollaboratorPermission,
}

/// Manages the collaborator grants of a quiz.
#[derive(Clone)]
pub struct CollaboratorService {
    /// Backing store.
    store: Arc<dyn Store>,
    /// Activity sink.
    activity: Arc<dyn ActivityLogger>,
}

impl CollaboratorService {
    /// Creates a new collaborator service.
    pub fn new(store: Arc<dyn Store>, activity: Arc<dyn ActivityLogger>) -> Self {
        Self { store, activity }
    }

    /// Grants a user access to a quiz. Requires manage permission.
    pub async fn add_collaborator(
        &self,
        ctx: &RequestContext,
        quiz_id: QuizId,
        req: AddCollaboratorRequest,
    ) -> AppResult<CollaboratorGrant> {
        let caller = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<CollaboratorGrant> = async {
            let quiz = require(tx.as_mut(), quiz_id, caller, QuizAccess::Manage).await?;
            if UserRepository::find_by_id(tx.as_mut(), req.user_id).await?.is_none() {
                return Err(AppError::not_found("User not found"));
            }
            if quiz.is_owned_by(req.user_id) {
                return Err(AppError::business_logic(
                    "The quiz owner cannot be added as a collaborator",
                ));
            }
            upsert_grant(tx.as_mut(), quiz_id, req.user_id, req.permission, caller).await
        }
        .await;
        let grant = finish(tx, result).await?;

        info!(
            user_id = %caller,
            quiz_id = %quiz_id,
            collaborator_id = %grant.user_id,
            permission = %grant.permission,
            "Collaborator added"
        );
        self.activity
            .record(
                caller,
                actions::COLLABORATOR_ADDED,
                Some(quiz_id),
                json!({ "user_id": grant.user_id, "permission": grant.permission }),
            )
            .await;
        Ok(grant)
    }

    /// Revokes a user's access: marks their grant removed and deactivates
    /// every share addressed to them. Requires manage permission.
    pub async fn remove_collaborator(
        &self,
        ctx: &RequestContext,
        quiz_id: QuizId,
        user_id: UserId,
    ) -> AppResult<()> {
        let caller = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<u64> = async {
            require(tx.as_mut(), quiz_id, caller, QuizAccess::Manage).await?;
            let grant = CollaboratorRepository::find_active(tx.as_mut(), quiz_id, user_id).await?;
            let shares_revoked =
                ShareRepository::deactivate_for_recipient(tx.as_mut(), quiz_id, user_id).await?;

            match grant {
                Some(mut grant) => {
                    grant.status = GrantStatus::Removed;
                    grant.updated_at = Utc::now();
                    CollaboratorRepository::save(tx.as_mut(), &grant).await?;
                }
                None if shares_revoked == 0 => {
                    return Err(AppError::not_found("Collaborator not found"));
                }
                None => {}
            }
            Ok(shares_revoked)
        }
        .await;
        let shares_revoked = finish(tx, result).await?;

        info!(
            user_id = %caller,
            quiz_id = %quiz_id,
            collaborator_id = %user_id,
            shares_revoked,
            "Collaborator removed"
        );
        self.activity
            .record(
                caller,
                actions::COLLABORATOR_REMOVED,
                Some(quiz_id),
                json!({ "user_id": user_id }),
            )
            .await;
        Ok(())
    }

    /// Lists the active grants of a quiz the caller can read.
    pub async fn list_collaborators(
        &self,
        ctx: &RequestContext,
        quiz_id: QuizId,
    ) -> AppResult<Vec<CollaboratorGrant>> {
        let mut tx = self.store.begin().await?;
        let result: AppResult<Vec<CollaboratorGrant>> = async {
            require(tx.as_mut(), quiz_id, ctx.user_id, QuizAccess::Read).await?;
            CollaboratorRepository::find_active_for_quiz(tx.as_mut(), quiz_id).await
        }
        .await;
        finish(tx, result).await
    }
}

/// Create the grant for `(quiz, user)` or update the existing row,
/// re-activating it if it was removed.
pub(crate) async fn upsert_grant(
    tx: &mut dyn StoreTx,
    quiz_id: QuizId,
    user_id: UserId,
    permission: CollaboratorPermission,
    granted_by: UserId,
) -> AppResult<CollaboratorGrant> {
    match CollaboratorRepository::find(tx, quiz_id, user_id).await? {
        Some(mut grant) => {
            grant.permission = permission;
            grant.status = GrantStatus::Active;
            grant.granted_by = granted_by;
            grant.updated_at = Utc::now();
            CollaboratorRepository::save(tx, &grant).await?;
            Ok(grant)
        }
        None => {
            let grant = CollaboratorGrant::new(quiz_id, user_id, permission, granted_by);
            CollaboratorRepository::create(tx, &grant).await?;
            Ok(grant)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizhub_core::error::ErrorKind;

    use crate::testing::Fixture;

    fn add(user_id: UserId, permission: CollaboratorPermission) -> AddCollaboratorRequest {
        AddCollaboratorRequest {
            user_id,
            permission,
        }
    }

    #[tokio::test]
    async fn test_readd_reactivates_grant() {
        let fx = Fixture::new();
        let owner = fx.user("owner@example.com").await;
        let u2 = fx.user("u2@example.com").await;
        let quiz = fx.quiz(&owner, "Algebra I", None).await;

        let first = fx
            .collaborators
            .add_collaborator(&owner, quiz.id, add(u2.user_id, CollaboratorPermission::View))
            .await
            .unwrap();
        fx.collaborators
            .remove_collaborator(&owner, quiz.id, u2.user_id)
            .await
            .unwrap();
        assert!(
            fx.collaborators
                .list_collaborators(&owner, quiz.id)
                .await
                .unwrap()
                .is_empty()
        );

        let second = fx
            .collaborators
            .add_collaborator(&owner, quiz.id, add(u2.user_id, CollaboratorPermission::Edit))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.status, GrantStatus::Active);

        let listed = fx.collaborators.list_collaborators(&u2, quiz.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].permission, CollaboratorPermission::Edit);
    }

    #[tokio::test]
    async fn test_collaborator_errors() {
        let fx = Fixture::new();
        let owner = fx.user("owner@example.com").await;
        let u2 = fx.user("u2@example.com").await;
        let quiz = fx.quiz(&owner, "Algebra I", None).await;

        let err = fx
            .collaborators
            .remove_collaborator(&owner, quiz.id, u2.user_id)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));

        let err = fx
            .collaborators
            .add_collaborator(&owner, quiz.id, add(UserId::new(), CollaboratorPermission::View))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));

        let err = fx
            .collaborators
            .add_collaborator(&owner, quiz.id, add(owner.user_id, CollaboratorPermission::Edit))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::BusinessLogic));

        // An editor cannot manage collaborators.
        fx.collaborators
            .add_collaborator(&owner, quiz.id, add(u2.user_id, CollaboratorPermission::Edit))
            .await
            .unwrap();
        let err = fx
            .collaborators
            .add_collaborator(&u2, quiz.id, add(owner.user_id, CollaboratorPermission::View))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Unauthorized));
    }
}
