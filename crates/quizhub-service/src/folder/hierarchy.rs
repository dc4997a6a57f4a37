//! Bounded walks over the folder parent links.
//!
//! Depth is never stored; every walk here recomputes it from `parent_id`
//! pointers. All walks track visited nodes and stop after [`MAX_WALK`]
//! hops, so corrupted (cyclic) data cannot hang a caller.

use std::collections::HashSet;

use tracing::{error, warn};

use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;
use quizhub_core::types::FolderId;
use quizhub_database::repositories::FolderRepository;
use quizhub_entity::folder::{Folder, FolderPath, PathSegment};

/// Hard cap on hops for every hierarchy walk.
pub const MAX_WALK: usize = 10;

/// Distance from a folder to the top level (0 for a top-level folder).
///
/// Returns [`MAX_WALK`] when the ancestor chain is cyclic or longer than
/// the cap. A dangling parent reference ends the walk.
pub async fn depth(tx: &mut dyn StoreTx, folder_id: FolderId) -> AppResult<usize> {
    let folder = FolderRepository::find_by_id(tx, folder_id)
        .await?
        .ok_or_else(|| AppError::not_found("Folder not found"))?;

    let mut visited = HashSet::from([folder.id]);
    let mut current = folder.parent_id;
    let mut hops = 0;

    while let Some(id) = current {
        if hops >= MAX_WALK || !visited.insert(id) {
            warn!(folder_id = %folder_id, "Folder ancestry exceeds walk limit or loops");
            return Ok(MAX_WALK);
        }
        match FolderRepository::find_by_id(tx, id).await? {
            Some(parent) => {
                hops += 1;
                current = parent.parent_id;
            }
            None => break,
        }
    }
    Ok(hops)
}

/// Depth of the deepest live descendant relative to `folder_id`
/// (0 for a leaf), capped at [`MAX_WALK`] levels.
pub async fn max_subtree_depth(tx: &mut dyn StoreTx, folder_id: FolderId) -> AppResult<usize> {
    let mut visited = HashSet::from([folder_id]);
    let mut level = vec![folder_id];
    let mut levels = 0;

    loop {
        let mut next = Vec::new();
        for id in &level {
            for child in FolderRepository::find_subfolders(tx, *id).await? {
                if visited.insert(child.id) {
                    next.push(child.id);
                }
            }
        }
        if next.is_empty() {
            return Ok(levels);
        }
        levels += 1;
        if levels >= MAX_WALK {
            warn!(folder_id = %folder_id, "Folder subtree exceeds walk limit");
            return Ok(MAX_WALK);
        }
        level = next;
    }
}

/// Whether `ancestor` is a proper ancestor of `candidate`.
///
/// A corrupted chain (cycle or over-long) is reported as `true` so that
/// moves relying on this check are refused.
pub async fn is_descendant_of(
    tx: &mut dyn StoreTx,
    candidate: FolderId,
    ancestor: FolderId,
) -> AppResult<bool> {
    let Some(start) = FolderRepository::find_by_id(tx, candidate).await? else {
        return Ok(false);
    };

    let mut visited = HashSet::from([candidate]);
    let mut current = start.parent_id;
    let mut hops = 0;

    while let Some(id) = current {
        if id == ancestor {
            return Ok(true);
        }
        hops += 1;
        if hops > MAX_WALK || !visited.insert(id) {
            warn!(
                candidate = %candidate,
                ancestor = %ancestor,
                "Folder ancestry loops; treating as descendant"
            );
            return Ok(true);
        }
        current = match FolderRepository::find_by_id(tx, id).await? {
            Some(folder) => folder.parent_id,
            None => None,
        };
    }
    Ok(false)
}

/// Breadcrumb from the top level down to `folder`.
///
/// A cycle is logged as a data-integrity error and the bounded chain is
/// returned with `cycle_detected` set.
pub async fn path(tx: &mut dyn StoreTx, folder: &Folder) -> AppResult<FolderPath> {
    let mut segments = vec![PathSegment {
        id: folder.id,
        name: folder.name.clone(),
    }];
    let mut visited = HashSet::from([folder.id]);
    let mut current = folder.parent_id;
    let mut cycle_detected = false;

    while let Some(id) = current {
        if segments.len() > MAX_WALK || !visited.insert(id) {
            error!(
                folder_id = %folder.id,
                at = %id,
                "Data integrity error: folder ancestry contains a cycle"
            );
            cycle_detected = true;
            break;
        }
        let Some(parent) = FolderRepository::find_by_id(tx, id).await? else {
            break;
        };
        segments.push(PathSegment {
            id: parent.id,
            name: parent.name.clone(),
        });
        current = parent.parent_id;
    }

    segments.reverse();
    Ok(FolderPath {
        segments,
        cycle_detected,
    })
}

/// `root` and all its live descendants in breadth-first order, parents
/// before children.
pub async fn collect_subtree(tx: &mut dyn StoreTx, root: &Folder) -> AppResult<Vec<Folder>> {
    let mut visited = HashSet::from([root.id]);
    let mut out = vec![root.clone()];
    let mut level = vec![root.id];
    let mut levels = 0;

    while !level.is_empty() {
        if levels >= MAX_WALK {
            warn!(folder_id = %root.id, "Folder subtree exceeds walk limit; truncating");
            break;
        }
        let mut next = Vec::new();
        for id in &level {
            for child in FolderRepository::find_subfolders(tx, *id).await? {
                if visited.insert(child.id) {
                    next.push(child.id);
                    out.push(child);
                }
            }
        }
        levels += 1;
        level = next;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizhub_core::traits::Store;
    use quizhub_core::types::UserId;
    use quizhub_database::MemoryStore;

    async fn chain(tx: &mut dyn StoreTx, owner: UserId, len: usize) -> Vec<Folder> {
        let mut out: Vec<Folder> = Vec::new();
        for i in 0..len {
            let parent = out.last().map(|f| f.id);
            let folder = Folder::new(owner, parent, format!("L{i}"), None, None);
            FolderRepository::create(tx, &folder).await.unwrap();
            out.push(folder);
        }
        out
    }

    #[tokio::test]
    async fn test_depth_and_subtree_depth() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let folders = chain(tx.as_mut(), UserId::new(), 4).await;

        assert_eq!(depth(tx.as_mut(), folders[0].id).await.unwrap(), 0);
        assert_eq!(depth(tx.as_mut(), folders[3].id).await.unwrap(), 3);
        assert_eq!(max_subtree_depth(tx.as_mut(), folders[0].id).await.unwrap(), 3);
        assert_eq!(max_subtree_depth(tx.as_mut(), folders[3].id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_is_descendant_of() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let folders = chain(tx.as_mut(), UserId::new(), 3).await;

        assert!(is_descendant_of(tx.as_mut(), folders[2].id, folders[0].id).await.unwrap());
        assert!(!is_descendant_of(tx.as_mut(), folders[0].id, folders[2].id).await.unwrap());
        assert!(!is_descendant_of(tx.as_mut(), folders[1].id, folders[1].id).await.unwrap());
    }

    #[tokio::test]
    async fn test_walks_terminate_on_cycle() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let owner = UserId::new();
        let mut a = Folder::new(owner, None, "A", None, None);
        let b = Folder::new(owner, Some(a.id), "B", None, None);
        a.parent_id = Some(b.id);
        FolderRepository::create(tx.as_mut(), &a).await.unwrap();
        FolderRepository::create(tx.as_mut(), &b).await.unwrap();
        let outsider = Folder::new(owner, None, "Outsider", None, None);
        FolderRepository::create(tx.as_mut(), &outsider).await.unwrap();

        assert_eq!(depth(tx.as_mut(), a.id).await.unwrap(), MAX_WALK);
        assert!(is_descendant_of(tx.as_mut(), a.id, outsider.id).await.unwrap());

        let crumbs = path(tx.as_mut(), &a).await.unwrap();
        assert!(crumbs.cycle_detected);
        assert_eq!(crumbs.segments.len(), 2);
        assert_eq!(crumbs.segments.last().unwrap().id, a.id);

        let subtree = collect_subtree(tx.as_mut(), &a).await.unwrap();
        assert_eq!(subtree.len(), 2);
    }

    #[tokio::test]
    async fn test_path_is_root_first() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let folders = chain(tx.as_mut(), UserId::new(), 3).await;

        let crumbs = path(tx.as_mut(), &folders[2]).await.unwrap();
        assert!(!crumbs.cycle_detected);
        assert_eq!(crumbs.display(), "L0 / L1 / L2");
    }
}
