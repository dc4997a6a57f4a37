//! # quizhub-core
//!
//! Core crate for QuizHub. Contains the storage capability traits,
//! configuration schemas, typed identifiers, query/pagination types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other QuizHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
