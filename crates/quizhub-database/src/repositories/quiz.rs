//! Quiz repository implementation.

use serde::{Deserialize, Serialize};

use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;
use quizhub_core::types::{
    FilterField, FolderId, PageRequest, Query, QuizId, SortField, UserId,
};
use quizhub_entity::quiz::{Quiz, QuizStatus};

use crate::table::EntityTable;

type Quizzes = EntityTable<Quiz>;

/// Folder scope of a quiz search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum FolderScope {
    /// Any folder, including the top level.
    Any,
    /// Only quizzes outside every folder.
    TopLevel,
    /// Only quizzes directly in this folder.
    Folder(FolderId),
}

/// Owner-scoped quiz search criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSearch {
    /// Substring matched case-insensitively against title or description.
    pub text: Option<String>,
    /// Folder restriction.
    pub folder: FolderScope,
    /// Required tag.
    pub tag: Option<String>,
    /// Required category.
    pub category: Option<String>,
    /// Required status.
    pub status: Option<QuizStatus>,
}

impl Default for QuizSearch {
    fn default() -> Self {
        Self {
            text: None,
            folder: FolderScope::Any,
            tag: None,
            category: None,
            status: None,
        }
    }
}

impl QuizSearch {
    fn filters(&self, owner: UserId) -> Vec<FilterField> {
        let mut filters = vec![FilterField::eq("owner_id", owner.0)];
        match self.folder {
            FolderScope::Any => {}
            FolderScope::TopLevel => filters.push(FilterField::is_null("folder_id")),
            FolderScope::Folder(id) => filters.push(FilterField::eq("folder_id", id.0)),
        }
        if let Some(tag) = &self.tag {
            filters.push(FilterField::has_element("tags", tag.trim()));
        }
        if let Some(category) = &self.category {
            filters.push(FilterField::eq("category", category.trim()));
        }
        if let Some(status) = self.status {
            filters.push(FilterField::eq("status", status.as_str()));
        }
        filters
    }
}

/// Repository for quiz rows.
#[derive(Debug, Clone, Copy)]
pub struct QuizRepository;

impl QuizRepository {
    /// Find a live quiz by ID.
    pub async fn find_by_id(tx: &mut dyn StoreTx, id: QuizId) -> AppResult<Option<Quiz>> {
        Quizzes::get(tx, id.0).await
    }

    /// Find a quiz by ID whether or not it is soft-deleted.
    pub async fn find_any(tx: &mut dyn StoreTx, id: QuizId) -> AppResult<Option<Quiz>> {
        Quizzes::get_any(tx, id.0).await
    }

    /// Whether `owner` has a live quiz with this title other than `except`.
    pub async fn title_taken(
        tx: &mut dyn StoreTx,
        owner: UserId,
        title: &str,
        except: Option<QuizId>,
    ) -> AppResult<bool> {
        let mut filters = vec![
            FilterField::eq("owner_id", owner.0),
            FilterField::eq("title", title),
        ];
        if let Some(id) = except {
            filters.push(FilterField::ne("id", id.0));
        }
        Ok(Quizzes::count(tx, filters).await? > 0)
    }

    /// Count an owner's live quizzes.
    pub async fn count_by_owner(tx: &mut dyn StoreTx, owner: UserId) -> AppResult<u64> {
        Quizzes::count(tx, vec![FilterField::eq("owner_id", owner.0)]).await
    }

    /// List the live quizzes directly in a folder.
    pub async fn find_in_folder(tx: &mut dyn StoreTx, folder: FolderId) -> AppResult<Vec<Quiz>> {
        Quizzes::find(
            tx,
            Query::filtered(vec![FilterField::eq("folder_id", folder.0)])
                .order(SortField::asc("title")),
        )
        .await
    }

    /// Count an owner's live quizzes in a folder (top level when `None`).
    pub async fn count_in_folder(
        tx: &mut dyn StoreTx,
        owner: UserId,
        folder: Option<FolderId>,
    ) -> AppResult<u64> {
        Quizzes::count(
            tx,
            vec![
                FilterField::eq("owner_id", owner.0),
                FilterField::eq_opt("folder_id", folder.map(|f| f.0)),
            ],
        )
        .await
    }

    /// Search an owner's live quizzes, most recently updated first.
    pub async fn search(
        tx: &mut dyn StoreTx,
        owner: UserId,
        search: &QuizSearch,
        page: &PageRequest,
    ) -> AppResult<(Vec<Quiz>, u64)> {
        let filters = search.filters(owner);
        let order = SortField::desc("updated_at");

        let text = match search.text.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => {
                let total = Quizzes::count(tx, filters.clone()).await?;
                let items = Quizzes::find(
                    tx,
                    Query::filtered(filters)
                        .order(order)
                        .window(page.limit(), page.offset()),
                )
                .await?;
                return Ok((items, total));
            }
        };

        // Title OR description: the store only conjoins filters, so the
        // disjunction is evaluated here over the structured matches.
        let candidates = Quizzes::find(tx, Query::filtered(filters).order(order)).await?;
        let needle = text.to_lowercase();
        let matched: Vec<Quiz> = candidates
            .into_iter()
            .filter(|q| {
                q.title.to_lowercase().contains(&needle)
                    || q
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect();
        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((items, total))
    }

    /// Insert a new quiz.
    pub async fn create(tx: &mut dyn StoreTx, quiz: &Quiz) -> AppResult<()> {
        Quizzes::insert(tx, quiz).await
    }

    /// Persist changes to an existing quiz.
    pub async fn save(tx: &mut dyn StoreTx, quiz: &Quiz) -> AppResult<()> {
        Quizzes::save(tx, quiz).await
    }

    /// Soft-delete a quiz.
    pub async fn soft_delete(tx: &mut dyn StoreTx, id: QuizId) -> AppResult<bool> {
        Quizzes::soft_delete(tx, id.0).await
    }

    /// Physically remove a quiz row.
    pub async fn delete_permanently(tx: &mut dyn StoreTx, id: QuizId) -> AppResult<bool> {
        Ok(Quizzes::purge(tx, vec![FilterField::eq("id", id.0)]).await? > 0)
    }
}
