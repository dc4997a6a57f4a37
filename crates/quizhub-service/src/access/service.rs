//! Access predicates over quizzes and folders.
//!
//! The predicates are side-effect free. The `require_*` helpers separate
//! existence from permission: a missing or soft-deleted quiz is
//! `NotFound`, an existing quiz the caller may not touch is
//! `Unauthorized`.

use std::sync::Arc;

use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::{Store, StoreTx};
use quizhub_core::types::{FolderId, QuizId, UserId};
use quizhub_database::finish;
use quizhub_database::repositories::{
    CollaboratorRepository, FolderRepository, QuizRepository, ShareRepository,
};
use quizhub_entity::quiz::Quiz;

/// Level of access required on a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAccess {
    /// Open and view.
    Read,
    /// Change content and metadata.
    Edit,
    /// Share and manage collaborators.
    Manage,
}

impl QuizAccess {
    fn verb(&self) -> &'static str {
        match self {
            Self::Read => "view",
            Self::Edit => "edit",
            Self::Manage => "manage",
        }
    }
}

/// Answers access questions in a dedicated read transaction.
#[derive(Clone)]
pub struct AccessService {
    /// Backing store.
    store: Arc<dyn Store>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Whether `caller` may read the quiz.
    pub async fn can_read(&self, quiz_id: QuizId, caller: UserId) -> AppResult<bool> {
        self.check(quiz_id, caller, QuizAccess::Read).await
    }

    /// Whether `caller` may edit the quiz.
    pub async fn can_edit(&self, quiz_id: QuizId, caller: UserId) -> AppResult<bool> {
        self.check(quiz_id, caller, QuizAccess::Edit).await
    }

    /// Whether `caller` may share the quiz and manage its collaborators.
    pub async fn can_manage(&self, quiz_id: QuizId, caller: UserId) -> AppResult<bool> {
        self.check(quiz_id, caller, QuizAccess::Manage).await
    }

    /// Whether `caller` may use the folder (live and owned).
    pub async fn can_access_folder(&self, folder_id: FolderId, caller: UserId) -> AppResult<bool> {
        let mut tx = self.store.begin().await?;
        let result = FolderRepository::find_owned(tx.as_mut(), folder_id, caller)
            .await
            .map(|f| f.is_some());
        finish(tx, result).await
    }

    async fn check(&self, quiz_id: QuizId, caller: UserId, level: QuizAccess) -> AppResult<bool> {
        let mut tx = self.store.begin().await?;
        let result: AppResult<bool> = async {
            match QuizRepository::find_by_id(tx.as_mut(), quiz_id).await? {
                Some(quiz) => allows(tx.as_mut(), &quiz, caller, level).await,
                None => Ok(false),
            }
        }
        .await;
        finish(tx, result).await
    }
}

/// Evaluate an access level against current grants and shares.
pub async fn allows(
    tx: &mut dyn StoreTx,
    quiz: &Quiz,
    caller: UserId,
    level: QuizAccess,
) -> AppResult<bool> {
    if quiz.is_deleted() {
        return Ok(false);
    }
    if quiz.is_owned_by(caller) {
        return Ok(true);
    }

    let grant = CollaboratorRepository::find_active(tx, quiz.id, caller).await?;
    let allowed = match level {
        QuizAccess::Read => {
            quiz.is_public
                || grant.is_some()
                || ShareRepository::has_active_share(tx, quiz.id, caller).await?
        }
        QuizAccess::Edit => grant.is_some_and(|g| g.permission.can_edit()),
        QuizAccess::Manage => grant.is_some_and(|g| g.permission.can_manage()),
    };
    Ok(allowed)
}

/// Load a live quiz and check `level` for `caller`.
pub async fn require(
    tx: &mut dyn StoreTx,
    quiz_id: QuizId,
    caller: UserId,
    level: QuizAccess,
) -> AppResult<Quiz> {
    let quiz = QuizRepository::find_by_id(tx, quiz_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quiz not found"))?;

    if allows(tx, &quiz, caller, level).await? {
        Ok(quiz)
    } else {
        Err(AppError::unauthorized(format!(
            "You do not have permission to {} this quiz",
            level.verb()
        )))
    }
}

/// Load a live quiz that only its owner may act on.
pub async fn require_owner(
    tx: &mut dyn StoreTx,
    quiz_id: QuizId,
    caller: UserId,
    action: &str,
) -> AppResult<Quiz> {
    let quiz = QuizRepository::find_by_id(tx, quiz_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quiz not found"))?;

    if quiz.is_owned_by(caller) {
        Ok(quiz)
    } else {
        Err(AppError::unauthorized(format!(
            "Only the quiz owner can {action} this quiz"
        )))
    }
}
