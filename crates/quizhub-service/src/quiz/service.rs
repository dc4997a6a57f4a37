//! Quiz lifecycle: create, update, delete, move, duplicate, open, search.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use quizhub_core::config::LimitsConfig;
use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::{Store, StoreTx};
use quizhub_core::types::{FolderId, PageRequest, PageResponse, QuizId, UserId};
use quizhub_database::finish;
use quizhub_database::repositories::{
    ActivityRepository, CollaboratorRepository, FolderScope, QuizRepository, QuizSearch,
    ShareRepository, UserRepository, ViewRepository,
};
use quizhub_entity::quiz::model::normalize_tags;
use quizhub_entity::quiz::{Question, Quiz, QuizStatus, QuizView};

use super::derived;
use super::validator::QuizValidator;
use crate::access::service::{require, require_owner};
use crate::access::QuizAccess;
use crate::activity::{ActivityLogger, actions};
use crate::context::RequestContext;
use crate::folder::service::owned_folder;

/// Upper bound on generated copy titles tried before giving up.
const MAX_COPY_ATTEMPTS: u32 = 100;

/// Request to create a new quiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateQuizRequest {
    /// Quiz title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered questions.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Folder to file the quiz in (None for top level).
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Subject category.
    #[serde(default)]
    pub category: Option<String>,
    /// Readable by everyone.
    #[serde(default)]
    pub is_public: bool,
    /// Initial status (active when omitted).
    #[serde(default)]
    pub status: Option<QuizStatus>,
}

/// Whitelisted quiz fields that may be changed after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuizRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description (empty clears it).
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement question set.
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
    /// Replacement tag set.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New category (empty clears it).
    #[serde(default)]
    pub category: Option<String>,
    /// New visibility. Owner only.
    #[serde(default)]
    pub is_public: Option<bool>,
    /// New status.
    #[serde(default)]
    pub status: Option<QuizStatus>,
    /// New folder; `Some(None)` moves to the top level. Owner only.
    #[serde(default, deserialize_with = "present")]
    pub folder_id: Option<Option<FolderId>>,
}

impl UpdateQuizRequest {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.questions.is_none()
            && self.tags.is_none()
            && self.category.is_none()
            && self.is_public.is_none()
            && self.status.is_none()
            && self.folder_id.is_none()
    }

    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.questions.is_some() {
            fields.push("questions");
        }
        if self.tags.is_some() {
            fields.push("tags");
        }
        if self.category.is_some() {
            fields.push("category");
        }
        if self.is_public.is_some() {
            fields.push("is_public");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.folder_id.is_some() {
            fields.push("folder_id");
        }
        fields
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Tables holding rows that reference a quiz.
#[derive(Debug, Clone, Copy)]
enum RelatedTable {
    Grants,
    Shares,
    Views,
    Activity,
}

impl RelatedTable {
    const ALL: [RelatedTable; 4] = [Self::Grants, Self::Shares, Self::Views, Self::Activity];

    fn name(self) -> &'static str {
        match self {
            Self::Grants => "quiz_collaborators",
            Self::Shares => "quiz_shares",
            Self::Views => "quiz_views",
            Self::Activity => "activity_log",
        }
    }

    async fn purge(self, tx: &mut dyn StoreTx, quiz_id: QuizId) -> AppResult<u64> {
        match self {
            Self::Grants => CollaboratorRepository::delete_for_quiz(tx, quiz_id).await,
            Self::Shares => ShareRepository::delete_for_quiz(tx, quiz_id).await,
            Self::Views => ViewRepository::delete_for_quiz(tx, quiz_id).await,
            Self::Activity => ActivityRepository::delete_for_quiz(tx, quiz_id).await,
        }
    }
}

/// Quiz operations with ownership and collaborator checks.
#[derive(Clone)]
pub struct QuizService {
    /// Backing store.
    store: Arc<dyn Store>,
    /// Size limits.
    limits: LimitsConfig,
    /// Question validator.
    validator: Arc<dyn QuizValidator>,
    /// Activity sink.
    activity: Arc<dyn ActivityLogger>,
}

impl QuizService {
    /// Creates a new quiz service.
    pub fn new(
        store: Arc<dyn Store>,
        limits: LimitsConfig,
        validator: Arc<dyn QuizValidator>,
        activity: Arc<dyn ActivityLogger>,
    ) -> Self {
        Self {
            store,
            limits,
            validator,
            activity,
        }
    }

    /// Creates a quiz owned by the caller.
    pub async fn create_quiz(&self, ctx: &RequestContext, req: CreateQuizRequest) -> AppResult<Quiz> {
        let owner = ctx.user_id;
        let title = self.validate_title(&req.title)?;

        let mut tx = self.store.begin().await?;
        let result: AppResult<Quiz> = async {
            tx.lock_owner(owner.0).await?;

            if UserRepository::find_by_id(tx.as_mut(), owner).await?.is_none() {
                return Err(AppError::not_found("Owner not found"));
            }

            let existing = QuizRepository::count_by_owner(tx.as_mut(), owner).await?;
            if existing >= self.limits.max_quizzes_per_owner {
                return Err(AppError::business_logic(format!(
                    "Quiz limit reached ({} quizzes per user)",
                    self.limits.max_quizzes_per_owner
                )));
            }

            if let Some(folder_id) = req.folder_id {
                owned_folder(tx.as_mut(), folder_id, owner).await?;
            }

            if QuizRepository::title_taken(tx.as_mut(), owner, &title, None).await? {
                return Err(AppError::business_logic(
                    "A quiz with this title already exists",
                ));
            }

            self.validator.validate_questions(&req.questions).into_result()?;

            let now = Utc::now();
            let quiz = Quiz {
                id: QuizId::new(),
                owner_id: owner,
                title,
                description: clean_optional(req.description),
                estimated_time_minutes: derived::estimated_time_minutes(&req.questions),
                difficulty: derived::difficulty(&req.questions),
                questions: req.questions,
                folder_id: req.folder_id,
                tags: normalize_tags(&req.tags),
                category: clean_optional(req.category),
                is_public: req.is_public,
                status: req.status.unwrap_or_default(),
                created_at: now,
                updated_at: now,
                last_accessed_at: None,
                deleted_at: None,
            };
            QuizRepository::create(tx.as_mut(), &quiz).await?;
            Ok(quiz)
        }
        .await;
        let quiz = finish(tx, result).await?;

        info!(user_id = %owner, quiz_id = %quiz.id, title = %quiz.title, "Quiz created");
        self.activity
            .record(owner, actions::QUIZ_CREATED, Some(quiz.id), json!({ "title": quiz.title }))
            .await;
        Ok(quiz)
    }

    /// Applies a whitelisted partial update.
    pub async fn update_quiz(
        &self,
        ctx: &RequestContext,
        quiz_id: QuizId,
        req: UpdateQuizRequest,
    ) -> AppResult<Quiz> {
        if req.is_empty() {
            return Err(AppError::validation("No valid fields to update"));
        }
        let title = req.title.as_deref().map(|t| self.validate_title(t)).transpose()?;
        let fields = req.changed_fields();
        let caller = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<Quiz> = async {
            let mut quiz = require(tx.as_mut(), quiz_id, caller, QuizAccess::Edit).await?;
            let owner = quiz.owner_id;

            if (req.is_public.is_some() || req.folder_id.is_some()) && !quiz.is_owned_by(caller) {
                return Err(AppError::unauthorized(
                    "Only the quiz owner can change visibility or folder",
                ));
            }
            tx.lock_owner(owner.0).await?;

            if let Some(title) = title {
                if QuizRepository::title_taken(tx.as_mut(), owner, &title, Some(quiz_id)).await? {
                    return Err(AppError::business_logic(
                        "A quiz with this title already exists",
                    ));
                }
                quiz.title = title;
            }

            if let Some(questions) = req.questions {
                self.validator.validate_questions(&questions).into_result()?;
                quiz.estimated_time_minutes = derived::estimated_time_minutes(&questions);
                quiz.difficulty = derived::difficulty(&questions);
                quiz.questions = questions;
            }

            if let Some(folder) = req.folder_id {
                if let Some(folder_id) = folder {
                    owned_folder(tx.as_mut(), folder_id, owner).await?;
                }
                quiz.folder_id = folder;
            }

            if let Some(description) = req.description {
                quiz.description = clean_optional(Some(description));
            }
            if let Some(tags) = req.tags {
                quiz.tags = normalize_tags(&tags);
            }
            if let Some(category) = req.category {
                quiz.category = clean_optional(Some(category));
            }
            if let Some(is_public) = req.is_public {
                quiz.is_public = is_public;
            }
            if let Some(status) = req.status {
                quiz.status = status;
            }

            quiz.updated_at = Utc::now();
            QuizRepository::save(tx.as_mut(), &quiz).await?;
            Ok(quiz)
        }
        .await;
        let quiz = finish(tx, result).await?;

        info!(user_id = %caller, quiz_id = %quiz_id, fields = ?fields, "Quiz updated");
        self.activity
            .record(caller, actions::QUIZ_UPDATED, Some(quiz_id), json!({ "fields": fields }))
            .await;
        Ok(quiz)
    }

    /// Deletes a quiz. Owner only.
    ///
    /// A soft delete only sets `deleted_at`. A permanent delete removes the
    /// row and then purges related rows table by table; a failing purge is
    /// logged and does not stop the others.
    pub async fn delete_quiz(
        &self,
        ctx: &RequestContext,
        quiz_id: QuizId,
        permanent: bool,
    ) -> AppResult<()> {
        let caller = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<Quiz> = async {
            let quiz = require_owner(tx.as_mut(), quiz_id, caller, "delete").await?;
            let removed = if permanent {
                QuizRepository::delete_permanently(tx.as_mut(), quiz_id).await?
            } else {
                QuizRepository::soft_delete(tx.as_mut(), quiz_id).await?
            };
            if !removed {
                return Err(AppError::not_found("Quiz not found"));
            }
            Ok(quiz)
        }
        .await;
        let quiz = finish(tx, result).await?;

        info!(user_id = %caller, quiz_id = %quiz_id, permanent, "Quiz deleted");

        if permanent {
            self.purge_related(quiz_id).await;
            self.activity
                .record(
                    caller,
                    actions::QUIZ_DELETED,
                    None,
                    json!({ "quiz_id": quiz_id, "title": quiz.title, "permanent": true }),
                )
                .await;
        } else {
            self.activity
                .record(
                    caller,
                    actions::QUIZ_DELETED,
                    Some(quiz_id),
                    json!({ "title": quiz.title, "permanent": false }),
                )
                .await;
        }
        Ok(())
    }

    /// Moves a quiz into one of the caller's folders, or to the top level.
    pub async fn move_quiz(
        &self,
        ctx: &RequestContext,
        quiz_id: QuizId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Quiz> {
        let caller = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<(Quiz, Option<FolderId>)> = async {
            tx.lock_owner(caller.0).await?;
            let mut quiz = require_owner(tx.as_mut(), quiz_id, caller, "move").await?;
            if let Some(target) = folder_id {
                owned_folder(tx.as_mut(), target, caller).await?;
            }
            let from = quiz.folder_id;
            quiz.folder_id = folder_id;
            quiz.updated_at = Utc::now();
            QuizRepository::save(tx.as_mut(), &quiz).await?;
            Ok((quiz, from))
        }
        .await;
        let (quiz, from) = finish(tx, result).await?;

        info!(
            user_id = %caller,
            quiz_id = %quiz_id,
            from = ?from,
            to = ?folder_id,
            "Quiz moved"
        );
        self.activity
            .record(
                caller,
                actions::QUIZ_MOVED,
                Some(quiz_id),
                json!({ "from": from, "to": folder_id }),
            )
            .await;
        Ok(quiz)
    }

    /// Copies a readable quiz into the caller's account.
    ///
    /// The copy is private. It stays in the original folder only when the
    /// caller owns the original.
    pub async fn duplicate_quiz(
        &self,
        ctx: &RequestContext,
        quiz_id: QuizId,
        new_title: Option<String>,
    ) -> AppResult<Quiz> {
        let caller = ctx.user_id;
        let requested = new_title
            .as_deref()
            .map(|t| self.validate_title(t))
            .transpose()?;

        let mut tx = self.store.begin().await?;
        let result: AppResult<Quiz> = async {
            tx.lock_owner(caller.0).await?;
            let source = require(tx.as_mut(), quiz_id, caller, QuizAccess::Read).await?;

            let existing = QuizRepository::count_by_owner(tx.as_mut(), caller).await?;
            if existing >= self.limits.max_quizzes_per_owner {
                return Err(AppError::business_logic(format!(
                    "Quiz limit reached ({} quizzes per user)",
                    self.limits.max_quizzes_per_owner
                )));
            }

            let title = match requested {
                Some(title) => {
                    if QuizRepository::title_taken(tx.as_mut(), caller, &title, None).await? {
                        return Err(AppError::business_logic(
                            "A quiz with this title already exists",
                        ));
                    }
                    title
                }
                None => self.copy_title(tx.as_mut(), caller, &source.title).await?,
            };

            let now = Utc::now();
            let copy = Quiz {
                id: QuizId::new(),
                owner_id: caller,
                title,
                folder_id: if source.is_owned_by(caller) { source.folder_id } else { None },
                is_public: false,
                created_at: now,
                updated_at: now,
                last_accessed_at: None,
                deleted_at: None,
                ..source
            };
            QuizRepository::create(tx.as_mut(), &copy).await?;
            Ok(copy)
        }
        .await;
        let copy = finish(tx, result).await?;

        info!(user_id = %caller, source_id = %quiz_id, quiz_id = %copy.id, "Quiz duplicated");
        self.activity
            .record(
                caller,
                actions::QUIZ_DUPLICATED,
                Some(copy.id),
                json!({ "source_id": quiz_id, "title": copy.title }),
            )
            .await;
        Ok(copy)
    }

    /// Opens a quiz: checks read access, bumps `last_accessed_at`, and
    /// records a view.
    pub async fn get_quiz(&self, ctx: &RequestContext, quiz_id: QuizId) -> AppResult<Quiz> {
        let caller = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<Quiz> = async {
            let mut quiz = require(tx.as_mut(), quiz_id, caller, QuizAccess::Read).await?;
            quiz.last_accessed_at = Some(Utc::now());
            QuizRepository::save(tx.as_mut(), &quiz).await?;
            Ok(quiz)
        }
        .await;
        let quiz = finish(tx, result).await?;

        self.record_view(quiz_id, caller).await;
        Ok(quiz)
    }

    /// Searches the caller's own quizzes.
    pub async fn search_quizzes(
        &self,
        ctx: &RequestContext,
        search: QuizSearch,
        page: PageRequest,
    ) -> AppResult<PageResponse<Quiz>> {
        let mut tx = self.store.begin().await?;
        let result: AppResult<(Vec<Quiz>, u64)> = async {
            if let FolderScope::Folder(folder_id) = search.folder {
                owned_folder(tx.as_mut(), folder_id, ctx.user_id).await?;
            }
            QuizRepository::search(tx.as_mut(), ctx.user_id, &search, &page).await
        }
        .await;
        let (items, total) = finish(tx, result).await?;
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    fn validate_title(&self, title: &str) -> AppResult<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Quiz title cannot be empty"));
        }
        if title.chars().count() > self.limits.max_title_length {
            return Err(AppError::validation(format!(
                "Quiz title cannot exceed {} characters",
                self.limits.max_title_length
            )));
        }
        Ok(title.to_string())
    }

    /// First free title among `"<title> (Copy)"`, `"<title> (Copy 2)"`, ...
    async fn copy_title(&self, tx: &mut dyn StoreTx, owner: UserId, title: &str) -> AppResult<String> {
        for attempt in 1..=MAX_COPY_ATTEMPTS {
            let candidate = if attempt == 1 {
                format!("{title} (Copy)")
            } else {
                format!("{title} (Copy {attempt})")
            };
            let candidate = self.validate_title(&candidate)?;
            if !QuizRepository::title_taken(tx, owner, &candidate, None).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::business_logic(
            "Could not find a free title for the copy; provide one explicitly",
        ))
    }

    async fn record_view(&self, quiz_id: QuizId, viewer: UserId) {
        let view = QuizView::now(quiz_id, viewer);
        let result = match self.store.begin().await {
            Ok(mut tx) => {
                let result = ViewRepository::create(tx.as_mut(), &view).await;
                finish(tx, result).await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(quiz_id = %quiz_id, viewer_id = %viewer, error = %e, "Failed to record quiz view");
        }
    }

    async fn purge_related(&self, quiz_id: QuizId) {
        for table in RelatedTable::ALL {
            let result = match self.store.begin().await {
                Ok(mut tx) => {
                    let result = table.purge(tx.as_mut(), quiz_id).await;
                    finish(tx, result).await
                }
                Err(e) => Err(e),
            };
            match result {
                Ok(removed) => {
                    debug!(quiz_id = %quiz_id, table = table.name(), removed, "Purged related rows")
                }
                Err(e) => warn!(
                    quiz_id = %quiz_id,
                    table = table.name(),
                    error = %e,
                    "Failed to purge related rows"
                ),
            }
        }
    }
}

/// Trim an optional text field; blank becomes `None`.
fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
