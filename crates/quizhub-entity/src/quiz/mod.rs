//! Quiz domain entities.

pub mod model;
pub mod question;
pub mod status;
pub mod view;

pub use model::Quiz;
pub use question::{Question, QuestionKind};
pub use status::{Difficulty, QuizStatus};
pub use view::QuizView;
