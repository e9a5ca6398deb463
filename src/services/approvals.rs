//! Approval engine — pending-loan decisions and stock reservation

use super::audit::AuditService;
use crate::{
    error::AppResult,
    models::loan::Loan,
    repository::Repository,
};

#[derive(Clone)]
pub struct ApprovalsService {
    repository: Repository,
    audit: AuditService,
}

impl ApprovalsService {
    pub fn new(repository: Repository, audit: AuditService) -> Self {
        Self { repository, audit }
    }

    /// Approve a pending loan, reserving stock for every line item as one
    /// all-or-nothing unit. On InsufficientStock no asset is left mutated.
    pub async fn approve(&self, loan_id: i32, approver_id: i32) -> AppResult<Loan> {
        self.repository.users.get_by_id(approver_id).await?;

        let before = self.repository.loans.get_by_id(loan_id).await?;
        let loan = self.repository.loans.approve(loan_id, approver_id).await?;

        tracing::info!(loan = loan_id, approver = approver_id, "loan approved");
        self.audit.record(
            approver_id,
            "approve",
            "loans",
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&loan).ok(),
        );
        Ok(loan)
    }

    /// Reject a pending loan with a reason. Stock is untouched.
    pub async fn reject(&self, loan_id: i32, approver_id: i32, reason: &str) -> AppResult<Loan> {
        self.repository.users.get_by_id(approver_id).await?;

        let before = self.repository.loans.get_by_id(loan_id).await?;
        let loan = self
            .repository
            .loans
            .reject(loan_id, approver_id, reason)
            .await?;

        tracing::info!(loan = loan_id, approver = approver_id, "loan rejected");
        self.audit.record(
            approver_id,
            "reject",
            "loans",
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&loan).ok(),
        );
        Ok(loan)
    }

    /// Cancel (delete) a pending loan. Stock is untouched.
    pub async fn cancel(&self, loan_id: i32, actor_id: i32) -> AppResult<()> {
        let before = self.repository.loans.get_by_id(loan_id).await?;
        self.repository.loans.cancel(loan_id).await?;

        tracing::info!(loan = loan_id, actor = actor_id, "loan cancelled");
        self.audit.record(
            actor_id,
            "cancel",
            "loans",
            serde_json::to_value(&before).ok(),
            None,
        );
        Ok(())
    }
}
