//! Borrow requests repository
//!
//! Every write runs in its own transaction. Writes that depend on the set of
//! approved requests of a book first lock that book's row, so two concurrent
//! submissions for the same book are checked one after the other.

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrow_request::{BorrowRequest, BorrowStatus, NewBorrowRequest, OverlapRule},
};

const COLUMNS: &str = "id, book_id, user_id, start_date, end_date, status, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowRequestsRepository: Send + Sync {
    /// All requests in storage order
    async fn list(&self) -> AppResult<Vec<BorrowRequest>>;

    /// Insert a Pending request unless an approved request of the same book
    /// collides with it under `rule`
    async fn create_unless_conflicting(
        &self,
        request: &NewBorrowRequest,
        rule: OverlapRule,
    ) -> AppResult<BorrowRequest>;

    /// Overwrite the status of a request. With `revalidate`, the request's
    /// range is checked against the other approved requests of its book first.
    async fn update_status(
        &self,
        id: i32,
        status: &str,
        revalidate: Option<OverlapRule>,
    ) -> AppResult<BorrowRequest>;
}

#[derive(Clone)]
pub struct PgBorrowRequestsRepository {
    pool: Pool<Postgres>,
}

impl PgBorrowRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Take the row lock on a book for the rest of the transaction
async fn lock_book(conn: &mut PgConnection, book_id: i32) -> AppResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM books WHERE id = $1 FOR UPDATE")
        .bind(book_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;
    Ok(())
}

/// Approved requests of a book, optionally leaving one request out
async fn approved_for_book(
    conn: &mut PgConnection,
    book_id: i32,
    excluding: Option<i32>,
) -> AppResult<Vec<BorrowRequest>> {
    let query = format!(
        r#"
        SELECT {}
        FROM borrow_requests
        WHERE book_id = $1
          AND status = 'Approved'
          AND ($2::INTEGER IS NULL OR id <> $2)
        ORDER BY id
        "#,
        COLUMNS
    );

    let rows = sqlx::query_as::<_, BorrowRequest>(&query)
        .bind(book_id)
        .bind(excluding)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

async fn fetch_request(conn: &mut PgConnection, id: i32) -> AppResult<BorrowRequest> {
    let query = format!("SELECT {} FROM borrow_requests WHERE id = $1", COLUMNS);
    sqlx::query_as::<_, BorrowRequest>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow request with id {} not found", id)))
}

fn conflict_error(book_id: i32, existing: &BorrowRequest) -> AppError {
    AppError::Conflict(format!(
        "Book {} is already booked from {} to {}",
        book_id, existing.start_date, existing.end_date
    ))
}

#[async_trait]
impl BorrowRequestsRepository for PgBorrowRequestsRepository {
    async fn list(&self) -> AppResult<Vec<BorrowRequest>> {
        let query = format!("SELECT {} FROM borrow_requests ORDER BY id", COLUMNS);
        let rows = sqlx::query_as::<_, BorrowRequest>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_unless_conflicting(
        &self,
        request: &NewBorrowRequest,
        rule: OverlapRule,
    ) -> AppResult<BorrowRequest> {
        let mut tx = self.pool.begin().await?;

        lock_book(&mut tx, request.book_id).await?;

        let approved = approved_for_book(&mut tx, request.book_id, None).await?;
        if let Some(existing) = rule.find_conflict(&request.range, &approved) {
            tracing::warn!(
                book_id = request.book_id,
                user_id = request.user_id,
                conflicting_request = existing.id,
                "Borrow request rejected: overlapping approved request"
            );
            // Dropping the transaction rolls it back
            return Err(conflict_error(request.book_id, existing));
        }

        let query = format!(
            r#"
            INSERT INTO borrow_requests (book_id, user_id, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        );
        let created = sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(request.book_id)
            .bind(request.user_id)
            .bind(request.range.start)
            .bind(request.range.end)
            .bind(BorrowStatus::Pending)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_status(
        &self,
        id: i32,
        status: &str,
        revalidate: Option<OverlapRule>,
    ) -> AppResult<BorrowRequest> {
        let mut tx = self.pool.begin().await?;

        if let Some(rule) = revalidate {
            // book_id and dates never change after insert, so reading them
            // before taking the book lock is safe
            let current = fetch_request(&mut tx, id).await?;
            let book_id = current.book_id;

            lock_book(&mut tx, book_id).await?;

            let others = approved_for_book(&mut tx, book_id, Some(id)).await?;
            if let Some(existing) = rule.find_conflict(&current.range(), &others) {
                tracing::warn!(
                    request_id = id,
                    conflicting_request = existing.id,
                    "Approval rejected: overlapping approved request"
                );
                return Err(conflict_error(book_id, existing));
            }
        }

        // The status CHECK constraint is the only guard on the value
        let query = format!(
            "UPDATE borrow_requests SET status = $1 WHERE id = $2 RETURNING {}",
            COLUMNS
        );
        let updated = sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(status)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow request with id {} not found", id)))?;

        tx.commit().await?;

        Ok(updated)
    }
}
