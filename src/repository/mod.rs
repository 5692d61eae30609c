//! Repository layer for database operations

pub mod books;
pub mod borrow_requests;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

pub use books::{BooksRepository, PgBooksRepository};
pub use borrow_requests::{BorrowRequestsRepository, PgBorrowRequestsRepository};
pub use users::{PgUsersRepository, UsersRepository};

/// Storage client handed to the services.
///
/// Built once at startup from the connection pool and shared through the
/// application state.
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: Arc<dyn UsersRepository>,
    pub books: Arc<dyn BooksRepository>,
    pub borrow_requests: Arc<dyn BorrowRequestsRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(PgUsersRepository::new(pool.clone())),
            books: Arc::new(PgBooksRepository::new(pool.clone())),
            borrow_requests: Arc::new(PgBorrowRequestsRepository::new(pool.clone())),
            pool,
        }
    }

    /// Assemble a repository from explicit table stores
    pub fn with_stores(
        pool: Pool<Postgres>,
        users: Arc<dyn UsersRepository>,
        books: Arc<dyn BooksRepository>,
        borrow_requests: Arc<dyn BorrowRequestsRepository>,
    ) -> Self {
        Self {
            pool,
            users,
            books,
            borrow_requests,
        }
    }

    /// Round trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
