//! Core traits defined in `quizhub-core` and implemented by other crates.

pub mod entity;
pub mod store;

pub use entity::Entity;
pub use store::{Record, Store, StoreTx};
