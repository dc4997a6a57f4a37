//! # quizhub-entity
//!
//! Domain entity models for QuizHub. Every struct implementing
//! [`quizhub_core::traits::Entity`] is one row of a store table; the rest
//! are value objects and computed views. All entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`.

pub mod activity;
pub mod collaborator;
pub mod folder;
pub mod quiz;
pub mod share;
pub mod user;
