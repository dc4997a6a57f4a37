//! # quizhub-service
//!
//! Business logic service layer for QuizHub. Each service owns a handle to
//! the [`Store`](quizhub_core::traits::Store), opens one transaction per
//! operation, and threads it through the repositories and hierarchy walks
//! it composes.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod access;
pub mod activity;
pub mod context;
pub mod folder;
pub mod notification;
pub mod quiz;
pub mod share;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use access::{AccessService, QuizAccess};
pub use activity::{ActivityLogger, StoreActivityLogger};
pub use context::RequestContext;
pub use folder::{FolderService, TreeService};
pub use notification::{LogNotificationSender, NotificationSender};
pub use quiz::{BulkService, QuizService, QuizValidator, StructuralQuizValidator};
pub use share::{CollaboratorService, ShareService};
pub use user::UserService;
