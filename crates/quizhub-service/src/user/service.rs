//! User registration and profile lookup.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use quizhub_core::error::AppError;
use quizhub_core::result::AppResult;
use quizhub_core::traits::Store;
use quizhub_core::types::UserId;
use quizhub_database::finish;
use quizhub_database::repositories::UserRepository;
use quizhub_entity::user::User;
use quizhub_entity::user::model::{is_valid_email, normalize_email};

use crate::context::RequestContext;

/// Data for registering a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    /// Email address (stored lower-cased).
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Handles user registration and lookup.
#[derive(Clone)]
pub struct UserService {
    /// Backing store.
    store: Arc<dyn Store>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registers a user.
    ///
    /// An address that was provisioned by an earlier share is claimed
    /// instead of rejected; any other existing address is a conflict.
    pub async fn register(&self, req: RegisterUserRequest) -> AppResult<User> {
        let email = normalize_email(&req.email);
        if !is_valid_email(&email) {
            return Err(AppError::validation(format!("Invalid email address: '{email}'")));
        }
        let display_name = req
            .display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let mut tx = self.store.begin().await?;
        let result: AppResult<User> = async {
            match UserRepository::find_by_email(tx.as_mut(), &email).await? {
                Some(mut user) if user.provisioned => {
                    user.provisioned = false;
                    user.display_name = display_name.or(user.display_name);
                    user.updated_at = Utc::now();
                    UserRepository::save(tx.as_mut(), &user).await?;
                    Ok(user)
                }
                Some(_) => Err(AppError::business_logic(
                    "A user with this email already exists",
                )),
                None => {
                    let user = User::new(&email, display_name, false);
                    UserRepository::create(tx.as_mut(), &user).await?;
                    Ok(user)
                }
            }
        }
        .await;
        let user = finish(tx, result).await?;

        info!(user_id = %user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_user(&self, user_id: UserId) -> AppResult<User> {
        let mut tx = self.store.begin().await?;
        let result = UserRepository::find_by_id(tx.as_mut(), user_id).await;
        finish(tx, result)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Gets the calling user's profile.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.get_user(ctx.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizhub_core::error::ErrorKind;
    use quizhub_database::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    fn request(email: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_string(),
            display_name: Some("Ada".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let users = service();
        let user = users.register(request(" Ada@Example.com ")).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert!(!user.provisioned);

        let ctx = RequestContext::new(user.id);
        assert_eq!(users.me(&ctx).await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let users = service();
        users.register(request("ada@example.com")).await.unwrap();
        let err = users.register(request("ADA@example.com")).await.unwrap_err();
        assert!(err.is(ErrorKind::BusinessLogic));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let err = service().register(request("not-an-email")).await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let err = service().get_user(UserId::new()).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }
}
