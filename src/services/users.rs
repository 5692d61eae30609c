//! User management service

use validator::Validate;

use crate::{
    config::UsersConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
    repository::Repository,
};

use super::auth::hash_password;

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new user
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.email_exists(&user.email).await? {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let password = hash_password(&user.password)?;
        let is_admin = user.is_admin.unwrap_or(false);
        let created = self
            .repository
            .users
            .create(&user.email, &password, is_admin)
            .await?;

        tracing::info!(user_id = created.id, is_admin, "User created");
        Ok(created)
    }

    /// Create the first administrator when the users table is empty
    pub async fn bootstrap_admin(&self, config: &UsersConfig) -> AppResult<Option<User>> {
        let (Some(email), Some(password)) = (
            config.bootstrap_admin_email.as_deref(),
            config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(None);
        };

        if self.repository.users.count().await? > 0 {
            return Ok(None);
        }

        let admin = self
            .create_user(CreateUser {
                email: email.to_string(),
                password: password.to_string(),
                is_admin: Some(true),
            })
            .await?;

        Ok(Some(admin))
    }
}
