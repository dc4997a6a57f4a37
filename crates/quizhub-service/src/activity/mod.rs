//! Best-effort activity logging.

pub mod logger;

pub use logger::{ActivityLogger, StoreActivityLogger, actions};
