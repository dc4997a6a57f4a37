//! Folder CRUD, move, and cascading delete with ownership enforcement.
//!
//! Folders have no sharing model: a folder that is missing, soft-deleted,
//! or owned by someone else is reported as not found.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use quizhub_core::config::LimitsConfig;
use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::{Store, StoreTx};
use quizhub_core::types::{FolderId, PageRequest, PageResponse, UserId};
use quizhub_database::finish;
use quizhub_database::repositories::{FolderRepository, QuizRepository};
use quizhub_entity::folder::Folder;

use super::hierarchy::{self, MAX_WALK};
use crate::activity::{ActivityLogger, actions};
use crate::context::RequestContext;

/// Request to create a new folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for top level).
    pub parent_id: Option<FolderId>,
    /// Display color hint.
    pub color: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Partial folder metadata update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolderRequest {
    /// New name.
    pub name: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl UpdateFolderRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.description.is_none()
    }
}

/// What happens to a deleted folder's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFolderOptions {
    /// Move contained quizzes up instead of soft-deleting them.
    pub move_quizzes_to_parent: bool,
    /// Move immediate subfolders up instead of deleting them recursively.
    pub move_subfolders_to_parent: bool,
}

impl Default for DeleteFolderOptions {
    fn default() -> Self {
        Self {
            move_quizzes_to_parent: true,
            move_subfolders_to_parent: true,
        }
    }
}

/// Counts reported by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFolderOutcome {
    /// Folders soft-deleted, including the target.
    pub folders_deleted: u64,
    /// Subfolders reparented to the destination.
    pub subfolders_moved: u64,
    /// Quizzes reparented to the destination.
    pub quizzes_moved: u64,
    /// Quizzes soft-deleted.
    pub quizzes_deleted: u64,
}

/// Manages folder operations for one owner at a time.
#[derive(Clone)]
pub struct FolderService {
    /// Backing store.
    store: Arc<dyn Store>,
    /// Hierarchy limits.
    limits: LimitsConfig,
    /// Activity sink.
    activity: Arc<dyn ActivityLogger>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        store: Arc<dyn Store>,
        mut limits: LimitsConfig,
        activity: Arc<dyn ActivityLogger>,
    ) -> Self {
        if limits.max_folder_depth >= MAX_WALK {
            warn!(
                configured = limits.max_folder_depth,
                cap = MAX_WALK - 1,
                "max_folder_depth exceeds the hierarchy walk limit; clamping"
            );
            limits.max_folder_depth = MAX_WALK - 1;
        }
        Self {
            store,
            limits,
            activity,
        }
    }

    /// Gets a folder owned by the caller.
    pub async fn get_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        let mut tx = self.store.begin().await?;
        let result = owned_folder(tx.as_mut(), folder_id, ctx.user_id).await;
        finish(tx, result).await
    }

    /// Lists the caller's folders directly under `parent` (top level when `None`).
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        parent: Option<FolderId>,
    ) -> AppResult<Vec<Folder>> {
        let mut tx = self.store.begin().await?;
        let result: AppResult<Vec<Folder>> = async {
            if let Some(parent_id) = parent {
                owned_folder(tx.as_mut(), parent_id, ctx.user_id).await?;
            }
            FolderRepository::find_children(tx.as_mut(), ctx.user_id, parent).await
        }
        .await;
        finish(tx, result).await
    }

    /// Case-insensitive name search over the caller's folders.
    pub async fn search_folders(
        &self,
        ctx: &RequestContext,
        text: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<Folder>> {
        let mut tx = self.store.begin().await?;
        let result = FolderRepository::search(tx.as_mut(), ctx.user_id, text.trim(), &page).await;
        let (items, total) = finish(tx, result).await?;
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    /// Creates a new folder.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        let name = self.validate_name(&req.name)?;
        let owner = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<Folder> = async {
            tx.lock_owner(owner.0).await?;

            if let Some(parent_id) = req.parent_id {
                owned_folder(tx.as_mut(), parent_id, owner).await?;
                let parent_depth = hierarchy::depth(tx.as_mut(), parent_id).await?;
                if parent_depth + 1 > self.limits.max_folder_depth {
                    return Err(AppError::business_logic(format!(
                        "Cannot create folder: max depth exceeded (limit {})",
                        self.limits.max_folder_depth
                    )));
                }
            }

            ensure_unique_name(tx.as_mut(), owner, req.parent_id, &name, None).await?;

            let folder = Folder::new(owner, req.parent_id, name, req.description, req.color);
            FolderRepository::create(tx.as_mut(), &folder).await?;
            Ok(folder)
        }
        .await;
        let folder = finish(tx, result).await?;

        info!(
            user_id = %owner,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            name = %folder.name,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<Folder> {
        self.update_folder(
            ctx,
            folder_id,
            UpdateFolderRequest {
                name: Some(new_name.to_string()),
                ..UpdateFolderRequest::default()
            },
        )
        .await
    }

    /// Updates folder metadata (name, color, description).
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<Folder> {
        if req.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        let name = req
            .name
            .as_deref()
            .map(|n| self.validate_name(n))
            .transpose()?;
        let owner = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<Folder> = async {
            tx.lock_owner(owner.0).await?;
            let mut folder = owned_folder(tx.as_mut(), folder_id, owner).await?;

            if let Some(name) = name {
                if name != folder.name {
                    ensure_unique_name(tx.as_mut(), owner, folder.parent_id, &name, Some(folder.id))
                        .await?;
                }
                folder.name = name;
            }
            if let Some(color) = req.color {
                folder.color = non_empty(color);
            }
            if let Some(description) = req.description {
                folder.description = non_empty(description);
            }
            folder.updated_at = Utc::now();

            FolderRepository::save(tx.as_mut(), &folder).await?;
            Ok(folder)
        }
        .await;
        let folder = finish(tx, result).await?;

        info!(user_id = %owner, folder_id = %folder.id, "Folder updated");
        Ok(folder)
    }

    /// Moves a folder under a new parent (top level when `None`).
    ///
    /// Only `parent_id` changes; the subtree moves with the folder.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_parent: Option<FolderId>,
    ) -> AppResult<Folder> {
        let owner = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result: AppResult<Folder> = async {
            tx.lock_owner(owner.0).await?;
            let mut folder = owned_folder(tx.as_mut(), folder_id, owner).await?;

            let new_depth = match new_parent {
                Some(parent_id) => {
                    owned_folder(tx.as_mut(), parent_id, owner).await?;
                    if parent_id == folder_id
                        || hierarchy::is_descendant_of(tx.as_mut(), parent_id, folder_id).await?
                    {
                        return Err(AppError::business_logic(
                            "Cannot move a folder into itself or one of its descendants",
                        ));
                    }
                    hierarchy::depth(tx.as_mut(), parent_id).await? + 1
                }
                None => 0,
            };

            let subtree = hierarchy::max_subtree_depth(tx.as_mut(), folder_id).await?;
            if new_depth + subtree > self.limits.max_folder_depth {
                return Err(AppError::business_logic(format!(
                    "Cannot move folder: max depth exceeded (limit {})",
                    self.limits.max_folder_depth
                )));
            }

            if folder.parent_id == new_parent {
                return Ok(folder);
            }
            ensure_unique_name(tx.as_mut(), owner, new_parent, &folder.name, Some(folder.id))
                .await?;

            folder.parent_id = new_parent;
            folder.updated_at = Utc::now();
            FolderRepository::save(tx.as_mut(), &folder).await?;
            Ok(folder)
        }
        .await;
        let folder = finish(tx, result).await?;

        info!(
            user_id = %owner,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            "Folder moved"
        );
        Ok(folder)
    }

    /// Deletes a folder, applying the cascade policy to its contents.
    ///
    /// Everything runs in one transaction; any failure leaves the tree as
    /// it was.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        options: DeleteFolderOptions,
    ) -> AppResult<DeleteFolderOutcome> {
        let owner = ctx.user_id;

        let mut tx = self.store.begin().await?;
        let result = delete_cascade(tx.as_mut(), owner, folder_id, options).await;
        let outcome = finish(tx, result).await?;

        info!(
            user_id = %owner,
            folder_id = %folder_id,
            folders_deleted = outcome.folders_deleted,
            subfolders_moved = outcome.subfolders_moved,
            quizzes_moved = outcome.quizzes_moved,
            quizzes_deleted = outcome.quizzes_deleted,
            "Folder deleted"
        );
        self.activity
            .record(
                owner,
                actions::FOLDER_DELETED,
                None,
                serde_json::json!({
                    "folder_id": folder_id,
                    "options": options,
                    "outcome": outcome,
                }),
            )
            .await;
        Ok(outcome)
    }

    /// Trims and checks a folder name.
    fn validate_name(&self, name: &str) -> AppResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if name.chars().count() > self.limits.max_folder_name_length {
            return Err(AppError::validation(format!(
                "Folder name cannot exceed {} characters",
                self.limits.max_folder_name_length
            )));
        }
        Ok(name.to_string())
    }
}

/// Loads a live folder owned by `owner`, or reports it as not found.
pub(crate) async fn owned_folder(
    tx: &mut dyn StoreTx,
    folder_id: FolderId,
    owner: UserId,
) -> AppResult<Folder> {
    FolderRepository::find_owned(tx, folder_id, owner)
        .await?
        .ok_or_else(|| AppError::not_found("Folder not found"))
}

async fn ensure_unique_name(
    tx: &mut dyn StoreTx,
    owner: UserId,
    parent: Option<FolderId>,
    name: &str,
    except: Option<FolderId>,
) -> AppResult<()> {
    match FolderRepository::find_sibling_by_name(tx, owner, parent, name).await? {
        Some(existing) if Some(existing.id) != except => Err(AppError::business_logic(format!(
            "A folder named '{name}' already exists here (duplicate name)"
        ))),
        _ => Ok(()),
    }
}

/// Post-order cascade for one folder.
///
/// The same policy applies at every level, so with
/// `move_subfolders_to_parent` only the target is deleted and its
/// immediate children move up; otherwise the whole subtree is deleted.
/// Anything that moves goes to the target's former parent, the nearest
/// surviving ancestor.
async fn delete_cascade(
    tx: &mut dyn StoreTx,
    owner: UserId,
    folder_id: FolderId,
    options: DeleteFolderOptions,
) -> AppResult<DeleteFolderOutcome> {
    tx.lock_owner(owner.0).await?;
    let root = owned_folder(tx, folder_id, owner).await?;
    let destination = root.parent_id;

    let (doomed, reparented) = if options.move_subfolders_to_parent {
        let children = FolderRepository::find_subfolders(tx, root.id).await?;
        (vec![root.clone()], children)
    } else {
        (hierarchy::collect_subtree(tx, &root).await?, Vec::new())
    };

    // Reject name collisions in the destination before any write.
    for child in &reparented {
        let clash = FolderRepository::find_sibling_by_name(tx, owner, destination, &child.name)
            .await?
            .is_some_and(|existing| existing.id != root.id);
        if clash {
            return Err(AppError::business_logic(format!(
                "Cannot move subfolder '{}' to the parent folder: duplicate name",
                child.name
            )));
        }
    }

    let mut outcome = DeleteFolderOutcome::default();
    let now = Utc::now();

    // Deepest folders first; the target is always last.
    for folder in doomed.iter().rev() {
        for mut quiz in QuizRepository::find_in_folder(tx, folder.id).await? {
            if options.move_quizzes_to_parent {
                quiz.folder_id = destination;
                quiz.updated_at = now;
                QuizRepository::save(tx, &quiz).await?;
                outcome.quizzes_moved += 1;
            } else if QuizRepository::soft_delete(tx, quiz.id).await? {
                outcome.quizzes_deleted += 1;
            }
        }

        if folder.id == root.id {
            for child in &reparented {
                let mut child = child.clone();
                child.parent_id = destination;
                child.updated_at = now;
                FolderRepository::save(tx, &child).await?;
                outcome.subfolders_moved += 1;
            }
        }

        if FolderRepository::soft_delete(tx, folder.id).await? {
            outcome.folders_deleted += 1;
        }
    }

    Ok(outcome)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
