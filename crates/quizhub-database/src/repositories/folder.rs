//! Folder repository implementation.

use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;
use quizhub_core::types::{FilterField, FolderId, PageRequest, Query, SortField, UserId};
use quizhub_entity::folder::Folder;

use crate::table::EntityTable;

type Folders = EntityTable<Folder>;

/// Repository for folder rows and sibling/child queries.
#[derive(Debug, Clone, Copy)]
pub struct FolderRepository;

impl FolderRepository {
    /// Find a live folder by ID.
    pub async fn find_by_id(tx: &mut dyn StoreTx, id: FolderId) -> AppResult<Option<Folder>> {
        Folders::get(tx, id.0).await
    }

    /// Find a live folder by ID that belongs to `owner`.
    pub async fn find_owned(
        tx: &mut dyn StoreTx,
        id: FolderId,
        owner: UserId,
    ) -> AppResult<Option<Folder>> {
        Ok(Folders::get(tx, id.0)
            .await?
            .filter(|f| f.owner_id == owner))
    }

    /// Find a live folder with exactly this name under `parent` for `owner`.
    pub async fn find_sibling_by_name(
        tx: &mut dyn StoreTx,
        owner: UserId,
        parent: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        Folders::find_one(
            tx,
            vec![
                FilterField::eq("owner_id", owner.0),
                FilterField::eq_opt("parent_id", parent.map(|p| p.0)),
                FilterField::eq("name", name),
            ],
        )
        .await
    }

    /// List the live children of `parent` (top level when `None`), by name.
    pub async fn find_children(
        tx: &mut dyn StoreTx,
        owner: UserId,
        parent: Option<FolderId>,
    ) -> AppResult<Vec<Folder>> {
        Folders::find(
            tx,
            Query::filtered(vec![
                FilterField::eq("owner_id", owner.0),
                FilterField::eq_opt("parent_id", parent.map(|p| p.0)),
            ])
            .order(SortField::asc("name")),
        )
        .await
    }

    /// List the live children of a folder regardless of owner, by name.
    pub async fn find_subfolders(tx: &mut dyn StoreTx, parent: FolderId) -> AppResult<Vec<Folder>> {
        Folders::find(
            tx,
            Query::filtered(vec![FilterField::eq("parent_id", parent.0)])
                .order(SortField::asc("name")),
        )
        .await
    }

    /// List every live folder of an owner, by name.
    pub async fn find_by_owner(tx: &mut dyn StoreTx, owner: UserId) -> AppResult<Vec<Folder>> {
        Folders::find(
            tx,
            Query::filtered(vec![FilterField::eq("owner_id", owner.0)])
                .order(SortField::asc("name")),
        )
        .await
    }

    /// Case-insensitive name search over an owner's live folders.
    pub async fn search(
        tx: &mut dyn StoreTx,
        owner: UserId,
        text: &str,
        page: &PageRequest,
    ) -> AppResult<(Vec<Folder>, u64)> {
        let filters = vec![
            FilterField::eq("owner_id", owner.0),
            FilterField::contains("name", text),
        ];
        let total = Folders::count(tx, filters.clone()).await?;
        let items = Folders::find(
            tx,
            Query::filtered(filters)
                .order(SortField::asc("name"))
                .window(page.limit(), page.offset()),
        )
        .await?;
        Ok((items, total))
    }

    /// Insert a new folder.
    pub async fn create(tx: &mut dyn StoreTx, folder: &Folder) -> AppResult<()> {
        Folders::insert(tx, folder).await
    }

    /// Persist changes to an existing folder.
    pub async fn save(tx: &mut dyn StoreTx, folder: &Folder) -> AppResult<()> {
        Folders::save(tx, folder).await
    }

    /// Soft-delete a folder.
    pub async fn soft_delete(tx: &mut dyn StoreTx, id: FolderId) -> AppResult<bool> {
        Folders::soft_delete(tx, id.0).await
    }
}
