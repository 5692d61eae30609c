//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ordinary,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ordinary => "ordinary",
            Role::Admin => "admin",
        }
    }

    /// Whether a user holding this role may perform an action requiring `required`
    pub fn grants(&self, required: Role) -> bool {
        match required {
            Role::Ordinary => true,
            Role::Admin => *self == Role::Admin,
        }
    }
}

impl From<bool> for Role {
    fn from(is_admin: bool) -> Self {
        if is_admin {
            Role::Admin
        } else {
            Role::Ordinary
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from(self.is_admin)
    }

    /// Fails with an authorization error unless the user holds `required`
    pub fn require_role(&self, required: Role) -> Result<(), AppError> {
        if self.role().grants(required) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "The {} role is required for this operation",
                required
            )))
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Email address, used as the login identity
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Grant administrator rights (defaults to false)
    pub is_admin: Option<bool>,
}
