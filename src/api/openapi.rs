//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrow_requests, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Book Lending API",
        version = "0.1.0",
        description = "Catalog browsing and borrow request approval",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::create_user,
        // Books
        books::list_books,
        // Borrow requests
        borrow_requests::list_requests,
        borrow_requests::submit_request,
        borrow_requests::update_request_status,
    ),
    components(
        schemas(
            crate::models::user::CreateUser,
            crate::models::book::Book,
            crate::models::borrow_request::BorrowRequest,
            crate::models::borrow_request::BorrowStatus,
            crate::models::borrow_request::CreateBorrowRequest,
            crate::models::borrow_request::UpdateBorrowRequest,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management"),
        (name = "books", description = "Book catalog"),
        (name = "borrow-requests", description = "Borrow requests and approvals")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
