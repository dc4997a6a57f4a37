//! Quiz sharing and collaborator management.

pub mod collaborators;
pub mod link;
pub mod service;

pub use collaborators::{AddCollaboratorRequest, CollaboratorService};
pub use service::{ShareQuizRequest, ShareQuizResult, ShareRecipientResult, ShareService};
