//! Activity log repository implementation.

use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;
use quizhub_core::types::{FilterField, Query, QuizId, SortField, UserId};
use quizhub_entity::activity::ActivityLogEntry;

use crate::table::EntityTable;

type Entries = EntityTable<ActivityLogEntry>;

/// Repository for activity log entries (append-only).
#[derive(Debug, Clone, Copy)]
pub struct ActivityRepository;

impl ActivityRepository {
    /// Append an entry.
    pub async fn create(tx: &mut dyn StoreTx, entry: &ActivityLogEntry) -> AppResult<()> {
        Entries::insert(tx, entry).await
    }

    /// Most recent entries of an owner.
    pub async fn find_recent(
        tx: &mut dyn StoreTx,
        owner: UserId,
        limit: u64,
    ) -> AppResult<Vec<ActivityLogEntry>> {
        Entries::find(
            tx,
            Query::filtered(vec![FilterField::eq("owner_id", owner.0)])
                .order(SortField::desc("created_at"))
                .window(limit, 0),
        )
        .await
    }

    /// Entries recorded for one quiz, oldest first.
    pub async fn find_by_quiz(
        tx: &mut dyn StoreTx,
        quiz: QuizId,
    ) -> AppResult<Vec<ActivityLogEntry>> {
        Entries::find(
            tx,
            Query::filtered(vec![FilterField::eq("quiz_id", quiz.0)])
                .order(SortField::asc("created_at")),
        )
        .await
    }

    /// Remove the entries of a quiz.
    pub async fn delete_for_quiz(tx: &mut dyn StoreTx, quiz: QuizId) -> AppResult<u64> {
        Entries::purge(tx, vec![FilterField::eq("quiz_id", quiz.0)]).await
    }
}
