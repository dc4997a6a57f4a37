//! Shared fixtures for service tests.

use std::sync::Arc;

use async_trait::async_trait;

use quizhub_core::config::LimitsConfig;
use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::Store;
use quizhub_core::types::{FolderId, UserId};
use quizhub_database::MemoryStore;
use quizhub_database::repositories::{ActivityRepository, FolderRepository, QuizRepository};
use quizhub_entity::activity::ActivityLogEntry;
use quizhub_entity::folder::Folder;
use quizhub_entity::quiz::{Question, Quiz};

use crate::access::AccessService;
use crate::activity::StoreActivityLogger;
use crate::context::RequestContext;
use crate::folder::{CreateFolderRequest, FolderService, TreeService};
use crate::notification::{LogNotificationSender, NotificationSender, ShareNotification};
use crate::quiz::{BulkService, CreateQuizRequest, QuizService, StructuralQuizValidator};
use crate::share::{CollaboratorService, ShareService};
use crate::user::{RegisterUserRequest, UserService};

/// Notification sender that always fails.
pub(crate) struct FailingNotifier;

#[async_trait]
impl NotificationSender for FailingNotifier {
    async fn send_share_notification(&self, _notification: &ShareNotification) -> AppResult<()> {
        Err(AppError::internal("smtp unavailable"))
    }
}

/// Every service wired to one in-memory store.
pub(crate) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub folders: FolderService,
    pub trees: TreeService,
    pub quizzes: QuizService,
    pub bulk: BulkService,
    pub shares: ShareService,
    pub collaborators: CollaboratorService,
    pub access: AccessService,
    pub users: UserService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(LimitsConfig::default(), Arc::new(LogNotificationSender))
    }

    pub fn with_limits(limits: LimitsConfig) -> Self {
        Self::build(limits, Arc::new(LogNotificationSender))
    }

    pub fn with_notifier(notifier: Arc<dyn NotificationSender>) -> Self {
        Self::build(LimitsConfig::default(), notifier)
    }

    fn build(limits: LimitsConfig, notifier: Arc<dyn NotificationSender>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let dyn_store: Arc<dyn Store> = store.clone();
        let activity = Arc::new(StoreActivityLogger::new(dyn_store.clone()));
        let quizzes = QuizService::new(
            dyn_store.clone(),
            limits.clone(),
            Arc::new(StructuralQuizValidator),
            activity.clone(),
        );

        Self {
            folders: FolderService::new(dyn_store.clone(), limits.clone(), activity.clone()),
            trees: TreeService::new(dyn_store.clone()),
            bulk: BulkService::new(quizzes.clone(), limits.clone(), activity.clone()),
            quizzes,
            shares: ShareService::new(dyn_store.clone(), limits, notifier, activity.clone()),
            collaborators: CollaboratorService::new(dyn_store.clone(), activity),
            access: AccessService::new(dyn_store.clone()),
            users: UserService::new(dyn_store),
            store,
        }
    }

    /// Register a user and return their request context.
    pub async fn user(&self, email: &str) -> RequestContext {
        let user = self
            .users
            .register(RegisterUserRequest {
                email: email.to_string(),
                display_name: None,
            })
            .await
            .unwrap();
        RequestContext::new(user.id)
    }

    pub async fn folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: Option<FolderId>,
    ) -> Folder {
        self.folders
            .create_folder(
                ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    parent_id: parent,
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    }

    pub async fn quiz(&self, ctx: &RequestContext, title: &str, folder: Option<FolderId>) -> Quiz {
        self.quizzes
            .create_quiz(ctx, quiz_request(title, folder))
            .await
            .unwrap()
    }

    /// Re-read a folder, including soft-deleted rows.
    pub async fn reload_folder(&self, id: FolderId) -> Folder {
        let mut tx = self.store.begin().await.unwrap();
        let folder = quizhub_database::EntityTable::<Folder>::get_any(tx.as_mut(), id.0)
            .await
            .unwrap()
            .unwrap();
        tx.rollback().await.unwrap();
        folder
    }

    /// Re-read a live folder.
    pub async fn live_folder(&self, id: FolderId) -> Option<Folder> {
        let mut tx = self.store.begin().await.unwrap();
        let folder = FolderRepository::find_by_id(tx.as_mut(), id).await.unwrap();
        tx.rollback().await.unwrap();
        folder
    }

    /// Re-read a quiz, including soft-deleted rows.
    pub async fn reload_quiz(&self, quiz: &Quiz) -> Option<Quiz> {
        let mut tx = self.store.begin().await.unwrap();
        let quiz = QuizRepository::find_any(tx.as_mut(), quiz.id).await.unwrap();
        tx.rollback().await.unwrap();
        quiz
    }

    /// Activity entries of a user, newest first.
    pub async fn activity(&self, owner: UserId) -> Vec<ActivityLogEntry> {
        let mut tx = self.store.begin().await.unwrap();
        let entries = ActivityRepository::find_recent(tx.as_mut(), owner, 100)
            .await
            .unwrap();
        tx.rollback().await.unwrap();
        entries
    }
}

pub(crate) fn sample_questions() -> Vec<Question> {
    vec![
        Question::multiple_choice(
            "q1",
            "What is 2 + 2?",
            vec!["3".to_string(), "4".to_string(), "5".to_string()],
            vec![1],
        ),
        Question::true_false("q2", "Zero is an even number", true),
    ]
}

pub(crate) fn quiz_request(title: &str, folder: Option<FolderId>) -> CreateQuizRequest {
    CreateQuizRequest {
        title: title.to_string(),
        questions: sample_questions(),
        folder_id: folder,
        ..Default::default()
    }
}
