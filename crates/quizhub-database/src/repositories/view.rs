//! Quiz view repository implementation.

use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;
use quizhub_core::types::{FilterField, QuizId};
use quizhub_entity::quiz::QuizView;

use crate::table::EntityTable;

type Views = EntityTable<QuizView>;

/// Repository for quiz view records.
#[derive(Debug, Clone, Copy)]
pub struct ViewRepository;

impl ViewRepository {
    /// Record a view.
    pub async fn create(tx: &mut dyn StoreTx, view: &QuizView) -> AppResult<()> {
        Views::insert(tx, view).await
    }

    /// Number of recorded views of a quiz.
    pub async fn count_for_quiz(tx: &mut dyn StoreTx, quiz: QuizId) -> AppResult<u64> {
        Views::count(tx, vec![FilterField::eq("quiz_id", quiz.0)]).await
    }

    /// Remove the views of a quiz.
    pub async fn delete_for_quiz(tx: &mut dyn StoreTx, quiz: QuizId) -> AppResult<u64> {
        Views::purge(tx, vec![FilterField::eq("quiz_id", quiz.0)]).await
    }
}
