//! Folder hierarchy: CRUD, moves, cascading delete, trees and breadcrumbs.

pub mod hierarchy;
pub mod service;
pub mod tree;

pub use service::{
    CreateFolderRequest, DeleteFolderOptions, DeleteFolderOutcome, FolderService,
    UpdateFolderRequest,
};
pub use tree::TreeService;
