//! Data models for the lending server

pub mod book;
pub mod borrow_request;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use borrow_request::{BorrowRequest, BorrowStatus, DateRange, OverlapRule};
pub use user::{Role, User};
