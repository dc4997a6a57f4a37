//! Folder tree building and breadcrumb resolution.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use quizhub_core::result::AppResult;
use quizhub_core::traits::{Store, StoreTx};
use quizhub_core::types::{FolderId, UserId};
use quizhub_database::finish;
use quizhub_database::repositories::{FolderRepository, QuizRepository};
use quizhub_entity::folder::{Folder, FolderNode, FolderPath, FolderTree};

use super::hierarchy::{self, MAX_WALK};
use super::service::owned_folder;
use crate::context::RequestContext;

/// Builds folder trees and resolves paths.
#[derive(Clone)]
pub struct TreeService {
    /// Backing store.
    store: Arc<dyn Store>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Builds the caller's folder tree, either whole or rooted at `root`.
    pub async fn get_tree(
        &self,
        ctx: &RequestContext,
        root: Option<FolderId>,
    ) -> AppResult<FolderTree> {
        let mut tx = self.store.begin().await?;
        let result = build_tree(tx.as_mut(), ctx.user_id, root).await;
        finish(tx, result).await
    }

    /// Gets the breadcrumb trail from the top level to the given folder.
    pub async fn get_path(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<FolderPath> {
        let mut tx = self.store.begin().await?;
        let result: AppResult<FolderPath> = async {
            let folder = owned_folder(tx.as_mut(), folder_id, ctx.user_id).await?;
            hierarchy::path(tx.as_mut(), &folder).await
        }
        .await;
        finish(tx, result).await
    }
}

/// Breadth-level traversal: counts are gathered level by level, then the
/// nested nodes are assembled from the collected levels.
async fn build_tree(
    tx: &mut dyn StoreTx,
    owner: UserId,
    root: Option<FolderId>,
) -> AppResult<FolderTree> {
    let all = FolderRepository::find_by_owner(tx, owner).await?;

    let mut children: HashMap<Option<FolderId>, Vec<&Folder>> = HashMap::new();
    for folder in &all {
        children.entry(folder.parent_id).or_default().push(folder);
    }

    let (top, base_depth, unfiled) = match root {
        Some(root_id) => {
            let root_folder = owned_folder(tx, root_id, owner).await?;
            let depth = hierarchy::depth(tx, root_id).await?;
            let top: Vec<&Folder> = all.iter().filter(|f| f.id == root_folder.id).collect();
            (top, depth, 0)
        }
        None => {
            let top = children.get(&None).cloned().unwrap_or_default();
            let unfiled = QuizRepository::count_in_folder(tx, owner, None).await?;
            (top, 0, unfiled)
        }
    };

    let mut quiz_counts: HashMap<FolderId, u64> = HashMap::new();
    let mut visited: HashSet<FolderId> = HashSet::new();
    let mut level: Vec<&Folder> = top.clone();
    let mut levels = 0;

    while !level.is_empty() && levels <= MAX_WALK {
        let mut next = Vec::new();
        for folder in level {
            if !visited.insert(folder.id) {
                continue;
            }
            let count = QuizRepository::count_in_folder(tx, owner, Some(folder.id)).await?;
            quiz_counts.insert(folder.id, count);
            if let Some(kids) = children.get(&Some(folder.id)) {
                next.extend(kids.iter().copied());
            }
        }
        level = next;
        levels += 1;
    }

    let roots: Vec<FolderNode> = top
        .iter()
        .filter_map(|f| assemble(f, base_depth, &children, &quiz_counts))
        .collect();

    Ok(FolderTree {
        total_folders: quiz_counts.len() as u64,
        roots,
        unfiled_quiz_count: unfiled,
    })
}

/// Assemble a node from the folders visited during traversal; anything the
/// traversal did not reach (cycle or cap) is left out.
fn assemble(
    folder: &Folder,
    depth: usize,
    children: &HashMap<Option<FolderId>, Vec<&Folder>>,
    quiz_counts: &HashMap<FolderId, u64>,
) -> Option<FolderNode> {
    quiz_counts.get(&folder.id)?;
    let mut seen = HashSet::from([folder.id]);
    Some(assemble_inner(folder, depth, children, quiz_counts, &mut seen))
}

fn assemble_inner(
    folder: &Folder,
    depth: usize,
    children: &HashMap<Option<FolderId>, Vec<&Folder>>,
    quiz_counts: &HashMap<FolderId, u64>,
    seen: &mut HashSet<FolderId>,
) -> FolderNode {
    let mut nodes = Vec::new();
    for kid in children.get(&Some(folder.id)).into_iter().flatten() {
        if quiz_counts.contains_key(&kid.id) && seen.insert(kid.id) {
            nodes.push(assemble_inner(kid, depth + 1, children, quiz_counts, seen));
        }
    }

    FolderNode {
        id: folder.id,
        name: folder.name.clone(),
        color: folder.color.clone(),
        depth,
        quiz_count: quiz_counts.get(&folder.id).copied().unwrap_or(0),
        subfolder_count: nodes.len() as u64,
        children: nodes,
    }
}
