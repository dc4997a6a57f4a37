//! Quiz organization: lifecycle operations, derived fields, validation,
//! and batches.

pub mod bulk;
pub mod derived;
pub mod service;
pub mod validator;

pub use bulk::{
    BulkAction, BulkData, BulkItemResult, BulkOperationRequest, BulkOperationResult, BulkService,
};
pub use service::{CreateQuizRequest, QuizService, UpdateQuizRequest};
pub use validator::{QuizValidator, StructuralQuizValidator, ValidationReport};
