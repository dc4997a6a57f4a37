//! Route handlers organized by domain.

pub mod folder;
pub mod health;
pub mod quiz;
pub mod share;
pub mod user;
