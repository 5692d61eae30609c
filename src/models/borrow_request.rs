//! Borrow request model, date ranges and overlap rules

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Lifecycle state of a borrow request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BorrowStatus {
    Pending,
    Approved,
    Denied,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Pending => "Pending",
            BorrowStatus::Approved => "Approved",
            BorrowStatus::Denied => "Denied",
        }
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BorrowStatus::Pending),
            "Approved" => Ok(BorrowStatus::Approved),
            "Denied" => Ok(BorrowStatus::Denied),
            _ => Err(format!("Invalid borrow status: {}", s)),
        }
    }
}

// SQLx conversion for BorrowStatus (stored as TEXT)
impl sqlx::Type<Postgres> for BorrowStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BorrowStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BorrowStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Borrow request as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRequest {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BorrowStatus,
    pub created_at: DateTime<Utc>,
}

impl BorrowRequest {
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(AppError::Validation(format!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two ISO 8601 calendar dates (YYYY-MM-DD)
    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Self::new(start, end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {}: expected YYYY-MM-DD", field)))
}

/// How a proposed range is tested against an approved one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapRule {
    /// Conflict when the proposed start or end day lies inside the approved
    /// range. A proposed range strictly enclosing an approved one slips
    /// through.
    #[default]
    Endpoint,
    /// Conflict when the two ranges share at least one day.
    Intersection,
}

impl OverlapRule {
    pub fn conflicts(&self, proposed: &DateRange, approved: &DateRange) -> bool {
        match self {
            OverlapRule::Endpoint => {
                approved.contains(proposed.start) || approved.contains(proposed.end)
            }
            OverlapRule::Intersection => {
                proposed.start <= approved.end && proposed.end >= approved.start
            }
        }
    }

    /// First request in `approved` that collides with `proposed`
    pub fn find_conflict<'a>(
        &self,
        proposed: &DateRange,
        approved: &'a [BorrowRequest],
    ) -> Option<&'a BorrowRequest> {
        approved
            .iter()
            .find(|existing| self.conflicts(proposed, &existing.range()))
    }
}

/// Borrow request submitted by a user
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrowRequest {
    pub book_id: i32,
    /// First day of the loan (YYYY-MM-DD)
    pub start_date: String,
    /// Last day of the loan, inclusive (YYYY-MM-DD)
    pub end_date: String,
}

/// Validated request ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBorrowRequest {
    pub book_id: i32,
    pub user_id: i32,
    pub range: DateRange,
}

/// Status change issued by an administrator
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBorrowRequest {
    /// New status: Pending, Approved or Denied
    pub status: String,
}
