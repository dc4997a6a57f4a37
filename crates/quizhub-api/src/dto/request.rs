//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use quizhub_core::error::AppError;
use quizhub_core::types::FolderId;
use quizhub_database::repositories::quiz::{FolderScope, QuizSearch};
use quizhub_entity::collaborator::CollaboratorPermission;
use quizhub_entity::quiz::QuizStatus;
use quizhub_service::folder::{CreateFolderRequest as SvcCreateFolder, DeleteFolderOptions};
use quizhub_service::user::RegisterUserRequest;

/// Run the derived validator and map failures to a validation error.
pub fn validate<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}

/// User registration body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserBody {
    /// Email address.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// Display name.
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
}

impl From<RegisterUserBody> for RegisterUserRequest {
    fn from(body: RegisterUserBody) -> Self {
        Self {
            email: body.email,
            display_name: body.display_name,
        }
    }
}

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderBody {
    /// Folder name.
    #[validate(length(min = 1, message = "Folder name is required"))]
    pub name: String,
    /// Parent folder ID.
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// Display color.
    #[serde(default)]
    #[validate(length(max = 32))]
    pub color: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateFolderBody> for SvcCreateFolder {
    fn from(body: CreateFolderBody) -> Self {
        Self {
            name: body.name,
            parent_id: body.parent_id,
            color: body.color,
            description: body.description,
        }
    }
}

/// Folder move body; a missing or null parent moves to the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFolderBody {
    /// New parent folder.
    #[serde(default)]
    pub new_parent_id: Option<FolderId>,
}

/// Query parameters of `DELETE /folders/{id}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeleteFolderQuery {
    /// Move contained quizzes to the parent instead of deleting them.
    #[serde(default = "default_true")]
    pub move_quizzes_to_parent: bool,
    /// Move subfolders to the parent instead of deleting them.
    #[serde(default = "default_true")]
    pub move_subfolders_to_parent: bool,
}

impl From<DeleteFolderQuery> for DeleteFolderOptions {
    fn from(q: DeleteFolderQuery) -> Self {
        Self {
            move_quizzes_to_parent: q.move_quizzes_to_parent,
            move_subfolders_to_parent: q.move_subfolders_to_parent,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Query parameters for listing folders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFoldersQuery {
    /// Parent to list (top level when absent).
    pub parent_id: Option<FolderId>,
}

/// Query parameters for the folder tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderTreeQuery {
    /// Subtree root (whole tree when absent).
    pub root_id: Option<FolderId>,
}

/// Search text for folders and quizzes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    /// Substring to match.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub q: String,
}

/// Query parameters of `GET /quizzes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListQuizzesQuery {
    /// Substring matched against title or description.
    #[validate(length(max = 200))]
    pub q: Option<String>,
    /// Only quizzes directly in this folder.
    pub folder_id: Option<FolderId>,
    /// Only quizzes outside every folder.
    #[serde(default)]
    pub top_level: bool,
    /// Required tag.
    pub tag: Option<String>,
    /// Required category.
    pub category: Option<String>,
    /// Required status.
    pub status: Option<QuizStatus>,
}

impl ListQuizzesQuery {
    /// Converts to repository search criteria.
    pub fn into_search(self) -> Result<QuizSearch, AppError> {
        let folder = match (self.folder_id, self.top_level) {
            (Some(_), true) => {
                return Err(AppError::validation(
                    "folder_id and top_level cannot be combined",
                ));
            }
            (Some(id), false) => FolderScope::Folder(id),
            (None, true) => FolderScope::TopLevel,
            (None, false) => FolderScope::Any,
        };
        Ok(QuizSearch {
            text: self.q.filter(|q| !q.trim().is_empty()),
            folder,
            tag: self.tag,
            category: self.category,
            status: self.status,
        })
    }
}

/// Query parameters of `DELETE /quizzes/{id}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeleteQuizQuery {
    /// Remove the row and its related records instead of soft-deleting.
    #[serde(default)]
    pub permanent: bool,
}

/// Quiz move body; a missing or null folder moves to the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveQuizBody {
    /// Destination folder.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

/// Quiz duplicate body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DuplicateQuizBody {
    /// Title for the copy (generated when absent).
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
}

/// Share body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShareQuizBody {
    /// Recipient addresses.
    #[validate(length(min = 1, message = "At least one recipient email is required"))]
    pub emails: Vec<String>,
    /// Offered permission.
    #[serde(default)]
    pub permission: Option<CollaboratorPermission>,
    /// Note for the recipients.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}
