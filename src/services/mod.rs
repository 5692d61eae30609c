//! Business logic services

pub mod auth;
pub mod books;
pub mod borrow_requests;
pub mod users;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub borrow_requests: borrow_requests::BorrowRequestsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            borrow_requests: borrow_requests::BorrowRequestsService::new(
                repository.clone(),
                config.borrowing.clone(),
            ),
            repository,
        }
    }

    /// Check that the store answers
    pub async fn ready(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
