//! Folder tree and breadcrumb structures for hierarchical display.

use serde::{Deserialize, Serialize};

use quizhub_core::types::FolderId;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Display color hint.
    pub color: Option<String>,
    /// Distance from the top level.
    pub depth: usize,
    /// Number of live quizzes directly in this folder.
    pub quiz_count: u64,
    /// Number of live child folders.
    pub subfolder_count: u64,
    /// Child folder nodes.
    pub children: Vec<FolderNode>,
}

/// A folder tree for one owner, optionally rooted at a specific folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root node(s) of the tree.
    pub roots: Vec<FolderNode>,
    /// Total number of folders in the tree.
    pub total_folders: u64,
    /// Number of live quizzes at the top level (outside any folder).
    /// Only filled for whole-owner trees.
    pub unfiled_quiz_count: u64,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            total_folders: 0,
            unfiled_quiz_count: 0,
        }
    }
}

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
}

/// Breadcrumb from the top level down to a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPath {
    /// Segments ordered root first; the last one is the folder itself.
    pub segments: Vec<PathSegment>,
    /// Set when the ancestor walk hit a cycle or the hop cap; the
    /// segments are then a truncated chain.
    pub cycle_detected: bool,
}

impl FolderPath {
    /// Render as `A / B / C`.
    pub fn display(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}
