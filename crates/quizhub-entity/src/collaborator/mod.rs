//! Collaborator grant entities.

pub mod model;

pub use model::{CollaboratorGrant, CollaboratorPermission, GrantStatus};
