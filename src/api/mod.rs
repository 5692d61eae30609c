//! API handlers for the lending REST endpoints

pub mod books;
pub mod borrow_requests;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::user::{Role, User},
    AppState,
};

/// Identity and secret carried by a basic auth header
#[derive(Debug, PartialEq, Eq)]
pub struct BasicCredentials {
    pub email: String,
    pub password: String,
}

impl BasicCredentials {
    /// Decode `Basic base64(email:password)`
    pub fn from_header(value: &str) -> Result<Self, AppError> {
        let malformed = || AppError::Authentication("Malformed authorization header".to_string());

        let (scheme, encoded) = value.trim().split_once(' ').ok_or_else(malformed)?;
        if !scheme.eq_ignore_ascii_case("Basic") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let decoded = STANDARD.decode(encoded.trim()).map_err(|_| malformed())?;
        let decoded = String::from_utf8(decoded).map_err(|_| malformed())?;
        // The password may itself contain ':'
        let (email, password) = decoded.split_once(':').ok_or_else(malformed)?;

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Extractor for a user authenticated by basic auth, any role
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?
            .to_str()
            .map_err(|_| AppError::Authentication("Malformed authorization header".to_string()))?;

        let credentials = BasicCredentials::from_header(auth_header)?;

        let user = state
            .services
            .auth
            .authenticate(&credentials.email, &credentials.password)
            .await?;

        Ok(AuthenticatedUser(user))
    }
}

/// Extractor for an authenticated administrator.
///
/// Rejects before the request body is read, so the outcome for other roles
/// does not depend on the payload.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        user.require_role(Role::Admin)?;
        Ok(AdminUser(user))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Users
        .route("/users", post(users::create_user))
        // Catalog
        .route("/books", get(books::list_books))
        // Borrow requests
        .route(
            "/borrow-requests",
            get(borrow_requests::list_requests).post(borrow_requests::submit_request),
        )
        .route("/borrow-requests/:id", put(borrow_requests::update_request_status))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
