//! User repository implementation.

use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;
use quizhub_core::types::{FilterField, UserId};
use quizhub_entity::user::User;
use quizhub_entity::user::model::normalize_email;

use crate::table::EntityTable;

type Users = EntityTable<User>;

/// Repository for user rows.
#[derive(Debug, Clone, Copy)]
pub struct UserRepository;

impl UserRepository {
    /// Find a live user by ID.
    pub async fn find_by_id(tx: &mut dyn StoreTx, id: UserId) -> AppResult<Option<User>> {
        Users::get(tx, id.0).await
    }

    /// Find a live user by email (case-insensitive).
    pub async fn find_by_email(tx: &mut dyn StoreTx, email: &str) -> AppResult<Option<User>> {
        Users::find_one(tx, vec![FilterField::eq("email", normalize_email(email))]).await
    }

    /// Insert a new user.
    pub async fn create(tx: &mut dyn StoreTx, user: &User) -> AppResult<()> {
        Users::insert(tx, user).await
    }

    /// Persist changes to an existing user.
    pub async fn save(tx: &mut dyn StoreTx, user: &User) -> AppResult<()> {
        Users::save(tx, user).await
    }
}
