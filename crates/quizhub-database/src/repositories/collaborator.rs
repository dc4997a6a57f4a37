//! Collaborator grant repository implementation.

use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;
use quizhub_core::types::{FilterField, Query, QuizId, SortField, UserId};
use quizhub_entity::collaborator::{CollaboratorGrant, GrantStatus};

use crate::table::EntityTable;

type Grants = EntityTable<CollaboratorGrant>;

/// Repository for quiz collaborator grants.
#[derive(Debug, Clone, Copy)]
pub struct CollaboratorRepository;

impl CollaboratorRepository {
    /// Find the grant row for a `(quiz, user)` pair in any status.
    pub async fn find(
        tx: &mut dyn StoreTx,
        quiz: QuizId,
        user: UserId,
    ) -> AppResult<Option<CollaboratorGrant>> {
        Grants::find_one(
            tx,
            vec![
                FilterField::eq("quiz_id", quiz.0),
                FilterField::eq("user_id", user.0),
            ],
        )
        .await
    }

    /// Find the active grant for a `(quiz, user)` pair.
    pub async fn find_active(
        tx: &mut dyn StoreTx,
        quiz: QuizId,
        user: UserId,
    ) -> AppResult<Option<CollaboratorGrant>> {
        Grants::find_one(
            tx,
            vec![
                FilterField::eq("quiz_id", quiz.0),
                FilterField::eq("user_id", user.0),
                FilterField::eq("status", GrantStatus::Active.as_str()),
            ],
        )
        .await
    }

    /// List the active grants on a quiz, oldest first.
    pub async fn find_active_for_quiz(
        tx: &mut dyn StoreTx,
        quiz: QuizId,
    ) -> AppResult<Vec<CollaboratorGrant>> {
        Grants::find(
            tx,
            Query::filtered(vec![
                FilterField::eq("quiz_id", quiz.0),
                FilterField::eq("status", GrantStatus::Active.as_str()),
            ])
            .order(SortField::asc("created_at")),
        )
        .await
    }

    /// Insert a new grant.
    pub async fn create(tx: &mut dyn StoreTx, grant: &CollaboratorGrant) -> AppResult<()> {
        Grants::insert(tx, grant).await
    }

    /// Persist changes to an existing grant.
    pub async fn save(tx: &mut dyn StoreTx, grant: &CollaboratorGrant) -> AppResult<()> {
        Grants::save(tx, grant).await
    }

    /// Remove every grant row of a quiz.
    pub async fn delete_for_quiz(tx: &mut dyn StoreTx, quiz: QuizId) -> AppResult<u64> {
        Grants::purge(tx, vec![FilterField::eq("quiz_id", quiz.0)]).await
    }
}
