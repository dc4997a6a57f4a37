//! Quiz share entities.

pub mod model;

pub use model::QuizShare;
