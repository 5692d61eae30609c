//! User management endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{error::AppResult, models::user::CreateUser};

use super::AdminUser;

/// Create a new user (admin only)
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("basic_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 200, description = "User created", body = String),
        (status = 400, description = "Invalid input or email already registered", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> AppResult<&'static str> {
    let Json(user) = payload?;

    state.services.users.create_user(user).await?;
    Ok("User created successfully")
}
