//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use quizhub_core::config::AppConfig;
use quizhub_core::traits::Store;
use quizhub_service::{
    ActivityLogger, BulkService, CollaboratorService, FolderService, LogNotificationSender,
    NotificationSender, QuizService, ShareService, StoreActivityLogger, StructuralQuizValidator,
    TreeService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Backing store (in-memory or PostgreSQL)
    pub store: Arc<dyn Store>,

    // ── Services ─────────────────────────────────────────────
    /// User registration and lookup
    pub user_service: Arc<UserService>,
    /// Folder CRUD, moves, and cascading delete
    pub folder_service: Arc<FolderService>,
    /// Folder trees and breadcrumbs
    pub tree_service: Arc<TreeService>,
    /// Quiz lifecycle operations
    pub quiz_service: Arc<QuizService>,
    /// Batched quiz operations
    pub bulk_service: Arc<BulkService>,
    /// Email sharing
    pub share_service: Arc<ShareService>,
    /// Collaborator grants
    pub collaborator_service: Arc<CollaboratorService>,
}

impl AppState {
    /// Wire every service over `store`, sending share notifications to the log.
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self::with_notifier(config, store, Arc::new(LogNotificationSender))
    }

    /// Wire every service over `store` with a custom notification channel.
    pub fn with_notifier(
        config: AppConfig,
        store: Arc<dyn Store>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        let limits = config.limits.clone();
        let activity: Arc<dyn ActivityLogger> =
            Arc::new(StoreActivityLogger::new(Arc::clone(&store)));

        let quiz_service = QuizService::new(
            Arc::clone(&store),
            limits.clone(),
            Arc::new(StructuralQuizValidator),
            Arc::clone(&activity),
        );
        let bulk_service = BulkService::new(quiz_service.clone(), limits.clone(), Arc::clone(&activity));

        Self {
            user_service: Arc::new(UserService::new(Arc::clone(&store))),
            folder_service: Arc::new(FolderService::new(
                Arc::clone(&store),
                limits.clone(),
                Arc::clone(&activity),
            )),
            tree_service: Arc::new(TreeService::new(Arc::clone(&store))),
            quiz_service: Arc::new(quiz_service),
            bulk_service: Arc::new(bulk_service),
            share_service: Arc::new(ShareService::new(
                Arc::clone(&store),
                limits,
                notifier,
                Arc::clone(&activity),
            )),
            collaborator_service: Arc::new(CollaboratorService::new(Arc::clone(&store), activity)),
            config: Arc::new(config),
            store,
        }
    }
}
