//! Borrow workflow: submission with conflict detection, listing and status
//! transitions

use crate::{
    config::BorrowingConfig,
    error::AppResult,
    models::{
        borrow_request::{BorrowRequest, BorrowStatus, CreateBorrowRequest, DateRange, NewBorrowRequest},
        user::User,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowRequestsService {
    repository: Repository,
    config: BorrowingConfig,
}

impl BorrowRequestsService {
    pub fn new(repository: Repository, config: BorrowingConfig) -> Self {
        Self { repository, config }
    }

    /// Record a Pending request for `requester`, unless an approved request
    /// of the same book already covers the proposed dates
    pub async fn submit(&self, requester: &User, request: CreateBorrowRequest) -> AppResult<BorrowRequest> {
        let range = DateRange::parse(&request.start_date, &request.end_date)?;

        let new_request = NewBorrowRequest {
            book_id: request.book_id,
            user_id: requester.id,
            range,
        };

        let created = self
            .repository
            .borrow_requests
            .create_unless_conflicting(&new_request, self.config.overlap_rule)
            .await?;

        tracing::info!(
            request_id = created.id,
            book_id = created.book_id,
            user_id = created.user_id,
            start_date = %created.start_date,
            end_date = %created.end_date,
            "Borrow request submitted"
        );
        Ok(created)
    }

    /// All requests, unfiltered
    pub async fn list(&self) -> AppResult<Vec<BorrowRequest>> {
        self.repository.borrow_requests.list().await
    }

    /// Overwrite the status of a request.
    ///
    /// The value is passed to the store as given; the table's check
    /// constraint decides whether it is acceptable.
    pub async fn update_status(&self, id: i32, status: &str) -> AppResult<BorrowRequest> {
        let approving = status == BorrowStatus::Approved.as_str();
        let revalidate = (approving && self.config.revalidate_on_approval)
            .then_some(self.config.overlap_rule);

        let updated = self
            .repository
            .borrow_requests
            .update_status(id, status, revalidate)
            .await?;

        tracing::info!(request_id = id, status = %updated.status, "Borrow request status updated");
        Ok(updated)
    }
}
