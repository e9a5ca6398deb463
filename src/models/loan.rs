//! Loan (borrow transaction) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{ConditionGrade, LoanStatus};

/// Loan header from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    /// Human-readable loan code, e.g. LN-260825-004217
    pub code: String,
    pub requester_id: i32,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub purpose: Option<String>,
    pub status: LoanStatus,
    pub approver_id: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// One asset-and-quantity pair within a loan. Immutable once created;
/// at most one line item per asset per loan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanLineItem {
    pub id: i32,
    pub loan_id: i32,
    pub asset_id: i32,
    pub requested_quantity: i32,
    /// Asset condition snapshot taken at submission time
    pub condition_at_request: ConditionGrade,
    pub note: Option<String>,
}

/// Line item enriched for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanLineDetails {
    #[serde(flatten)]
    pub line: LoanLineItem,
    pub asset_name: String,
    /// Whether a pre-issue inspection has been recorded for this line
    pub inspected: bool,
}

/// Loan with full details for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    #[serde(flatten)]
    pub loan: Loan,
    pub lines: Vec<LoanLineDetails>,
    pub is_overdue: bool,
}

/// One requested asset line in a submission. Serialize is required by the
/// length rule on `CreateLoan.lines`, which echoes the offending value into
/// the validation error params.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RequestedLine {
    pub asset_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub note: Option<String>,
}

/// Submit loan request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateLoan {
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(length(max = 2000))]
    pub purpose: Option<String>,
    #[validate(length(min = 1), nested)]
    pub lines: Vec<RequestedLine>,
}

/// Reject loan request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RejectLoan {
    #[validate(length(min = 1, max = 2000))]
    pub reason: String,
}
