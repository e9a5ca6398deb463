//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Active,
    Returned,
    Rejected,
}

impl LoanStatus {
    /// Legal edges of the loan state machine. Cancellation is a hard delete
    /// from `Pending` and therefore not an edge here.
    pub fn can_transition_to(self, next: LoanStatus) -> bool {
        matches!(
            (self, next),
            (LoanStatus::Pending, LoanStatus::Approved)
                | (LoanStatus::Pending, LoanStatus::Rejected)
                | (LoanStatus::Approved, LoanStatus::Active)
                | (LoanStatus::Active, LoanStatus::Returned)
        )
    }

    /// Terminal statuses admit no further transition
    pub fn is_terminal(self) -> bool {
        matches!(self, LoanStatus::Returned | LoanStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
            LoanStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ConditionGrade
// ---------------------------------------------------------------------------

/// Physical condition grade of an asset or checklist point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "condition_grade", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConditionGrade {
    Good,
    Fair,
    Poor,
}

// ---------------------------------------------------------------------------
// ReturnCondition
// ---------------------------------------------------------------------------

/// Condition bucket assigned to a quantity split at return time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "return_condition", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReturnCondition {
    Good,
    Defective,
    Damaged,
    Lost,
}

impl ReturnCondition {
    /// Lost units never go back on the shelf
    pub fn releases_stock(self) -> bool {
        !matches!(self, ReturnCondition::Lost)
    }

    pub fn damage_detected(self) -> bool {
        matches!(self, ReturnCondition::Defective | ReturnCondition::Damaged)
    }

    /// Severity is derived from the condition bucket, never set independently
    pub fn damage_severity(self) -> DamageSeverity {
        match self {
            ReturnCondition::Defective => DamageSeverity::Minor,
            ReturnCondition::Damaged => DamageSeverity::Major,
            ReturnCondition::Good | ReturnCondition::Lost => DamageSeverity::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReturnCondition::Good => "good",
            ReturnCondition::Defective => "defective",
            ReturnCondition::Damaged => "damaged",
            ReturnCondition::Lost => "lost",
        }
    }
}

impl std::fmt::Display for ReturnCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DamageSeverity
// ---------------------------------------------------------------------------

/// Derived damage classification stored on return details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "damage_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DamageSeverity {
    None,
    Minor,
    Major,
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Role attached to a user record, used for attribution only.
/// Authorization is enforced upstream of this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Requester,
    Approver,
    Inspector,
    ReturnOfficer,
}
