//! Borrow request endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::borrow_request::{BorrowRequest, CreateBorrowRequest, UpdateBorrowRequest},
};

use super::{AdminUser, AuthenticatedUser};

/// List every borrow request (admin only)
#[utoipa::path(
    get,
    path = "/borrow-requests",
    tag = "borrow-requests",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "All borrow requests in storage order", body = Vec<BorrowRequest>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<BorrowRequest>>> {
    let requests = state.services.borrow_requests.list().await?;
    Ok(Json(requests))
}

/// Ask to borrow a book for a date range
#[utoipa::path(
    post,
    path = "/borrow-requests",
    tag = "borrow-requests",
    security(("basic_auth" = [])),
    request_body = CreateBorrowRequest,
    responses(
        (status = 200, description = "Request recorded as Pending", body = String),
        (status = 400, description = "Invalid dates or overlapping approved request", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<CreateBorrowRequest>, JsonRejection>,
) -> AppResult<&'static str> {
    let Json(request) = payload?;

    state.services.borrow_requests.submit(&user, request).await?;
    Ok("Request submitted")
}

/// Change the status of a borrow request (admin only)
#[utoipa::path(
    put,
    path = "/borrow-requests/{id}",
    tag = "borrow-requests",
    security(("basic_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow request ID")
    ),
    request_body = UpdateBorrowRequest,
    responses(
        (status = 200, description = "Status updated", body = String),
        (status = 400, description = "Status rejected by the store", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Borrow request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request_status(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateBorrowRequest>, JsonRejection>,
) -> AppResult<&'static str> {
    let Json(update) = payload?;

    state
        .services
        .borrow_requests
        .update_status(id, &update.status)
        .await?;
    Ok("Request updated")
}
