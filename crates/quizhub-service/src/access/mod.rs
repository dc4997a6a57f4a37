//! Quiz ownership and collaborator access control.

pub mod service;

pub use service::{AccessService, QuizAccess};
