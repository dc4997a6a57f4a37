//! Quiz share repository implementation.

use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;
use quizhub_core::types::{FilterField, Query, QuizId, SortField, UserId};
use quizhub_entity::share::QuizShare;

use crate::table::EntityTable;

type Shares = EntityTable<QuizShare>;

/// Repository for quiz share records.
#[derive(Debug, Clone, Copy)]
pub struct ShareRepository;

impl ShareRepository {
    /// Whether an active share of `quiz` is addressed to `recipient`.
    pub async fn has_active_share(
        tx: &mut dyn StoreTx,
        quiz: QuizId,
        recipient: UserId,
    ) -> AppResult<bool> {
        let count = Shares::count(
            tx,
            vec![
                FilterField::eq("quiz_id", quiz.0),
                FilterField::eq("recipient_id", recipient.0),
                FilterField::eq("is_active", true),
            ],
        )
        .await?;
        Ok(count > 0)
    }

    /// Deactivate every active share of `quiz` addressed to `recipient`.
    /// Returns the number of shares deactivated.
    pub async fn deactivate_for_recipient(
        tx: &mut dyn StoreTx,
        quiz: QuizId,
        recipient: UserId,
    ) -> AppResult<u64> {
        let active = Shares::find(
            tx,
            Query::filtered(vec![
                FilterField::eq("quiz_id", quiz.0),
                FilterField::eq("recipient_id", recipient.0),
                FilterField::eq("is_active", true),
            ]),
        )
        .await?;

        let mut deactivated = 0;
        for mut share in active {
            share.is_active = false;
            Shares::save(tx, &share).await?;
            deactivated += 1;
        }
        Ok(deactivated)
    }

    /// List the shares of a quiz, newest first.
    pub async fn find_by_quiz(tx: &mut dyn StoreTx, quiz: QuizId) -> AppResult<Vec<QuizShare>> {
        Shares::find(
            tx,
            Query::filtered(vec![FilterField::eq("quiz_id", quiz.0)])
                .order(SortField::desc("created_at")),
        )
        .await
    }

    /// Insert a new share.
    pub async fn create(tx: &mut dyn StoreTx, share: &QuizShare) -> AppResult<()> {
        Shares::insert(tx, share).await
    }

    /// Remove every share of a quiz.
    pub async fn delete_for_quiz(tx: &mut dyn StoreTx, quiz: QuizId) -> AppResult<u64> {
        Shares::purge(tx, vec![FilterField::eq("quiz_id", quiz.0)]).await
    }
}
