//! Custom Axum extractors.

pub mod caller;
pub mod pagination;

pub use caller::{CALLER_HEADER, Caller};
pub use pagination::PaginationParams;
