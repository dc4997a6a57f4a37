//! Typed repositories composed over [`EntityTable`](crate::table::EntityTable).
//!
//! Repositories are stateless: every method takes the transaction it runs
//! in, so one service operation can span several repositories atomically.

pub mod activity;
pub mod collaborator;
pub mod folder;
pub mod quiz;
pub mod share;
pub mod user;
pub mod view;

pub use activity::ActivityRepository;
pub use collaborator::CollaboratorRepository;
pub use folder::FolderRepository;
pub use quiz::{FolderScope, QuizRepository, QuizSearch};
pub use share::ShareRepository;
pub use user::UserRepository;
pub use view::ViewRepository;
