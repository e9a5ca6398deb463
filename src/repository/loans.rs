//! Loans repository — request creation and the approval state machine

use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::assets::AssetsRepository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ConditionGrade, LoanStatus},
        loan::{Loan, LoanDetails, LoanLineDetails, LoanLineItem},
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))
    }

    /// Line items of a loan, in insertion order
    pub async fn get_lines(&self, loan_id: i32) -> AppResult<Vec<LoanLineItem>> {
        let lines = sqlx::query_as::<_, LoanLineItem>(
            "SELECT * FROM loan_line_items WHERE loan_id = $1 ORDER BY id",
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    /// Get one line item by ID
    pub async fn get_line(&self, line_item_id: i32) -> AppResult<LoanLineItem> {
        sqlx::query_as::<_, LoanLineItem>("SELECT * FROM loan_line_items WHERE id = $1")
            .bind(line_item_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan line item {} not found", line_item_id)))
    }

    /// Loan with enriched line items and overdue flag
    pub async fn get_details(&self, id: i32) -> AppResult<LoanDetails> {
        let loan = self.get_by_id(id).await?;

        let rows = sqlx::query_as::<_, LineWithAsset>(
            r#"
            SELECT li.id, li.loan_id, li.asset_id, li.requested_quantity,
                   li.condition_at_request, li.note,
                   a.name AS asset_name,
                   EXISTS(SELECT 1 FROM inspections i WHERE i.line_item_id = li.id) AS inspected
            FROM loan_line_items li
            JOIN assets a ON a.id = li.asset_id
            WHERE li.loan_id = $1
            ORDER BY li.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let is_overdue =
            loan.returned_at.is_none() && loan.due_date < Utc::now().date_naive() && !loan.status.is_terminal();

        Ok(LoanDetails {
            loan,
            lines: rows.into_iter().map(LineWithAsset::into_details).collect(),
            is_overdue,
        })
    }

    /// List loans, newest first, optionally filtered by status
    pub async fn list(&self, status: Option<LoanStatus>) -> AppResult<Vec<Loan>> {
        let loans = match status {
            Some(s) => {
                sqlx::query_as::<_, Loan>(
                    "SELECT * FROM loans WHERE status = $1 ORDER BY crea_date DESC",
                )
                .bind(s)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY crea_date DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(loans)
    }

    /// Loans belonging to a requester
    pub async fn get_user_loans(&self, requester_id: i32) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE requester_id = $1 ORDER BY crea_date DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Create a pending loan with its line items. Requesting reserves
    /// nothing; stock stays untouched until approval.
    pub async fn create(
        &self,
        code: &str,
        requester_id: i32,
        start_date: chrono::NaiveDate,
        due_date: chrono::NaiveDate,
        purpose: Option<&str>,
        lines: &[(i32, i32, ConditionGrade, Option<String>)],
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (code, requester_id, start_date, due_date, purpose, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(requester_id)
        .bind(start_date)
        .bind(due_date)
        .bind(purpose)
        .fetch_one(&mut *tx)
        .await?;

        for (asset_id, quantity, condition, note) in lines {
            sqlx::query(
                r#"
                INSERT INTO loan_line_items (loan_id, asset_id, requested_quantity, condition_at_request, note)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(loan.id)
            .bind(asset_id)
            .bind(quantity)
            .bind(condition)
            .bind(note.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(loan)
    }

    /// Approve a pending loan: flip the status and reserve stock for every
    /// line item as one all-or-nothing unit. The whole operation runs in a
    /// single transaction, so a refused decrement on a later line rolls back
    /// every decrement already applied — partial reservations never survive.
    pub async fn approve(&self, loan_id: i32, approver_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE loans SET status = 'approved', approver_id = $2, approved_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(loan_id)
        .bind(approver_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::status_conflict(&mut tx, loan_id, "approve").await?);
        }

        // Decrement in asset id order so concurrent approvals of loans that
        // share assets take the row locks in the same order and never deadlock.
        let lines = sqlx::query_as::<_, LoanLineItem>(
            "SELECT * FROM loan_line_items WHERE loan_id = $1 ORDER BY asset_id",
        )
        .bind(loan_id)
        .fetch_all(&mut *tx)
        .await?;

        for line in &lines {
            let reserved =
                AssetsRepository::adjust_stock(&mut tx, line.asset_id, -line.requested_quantity)
                    .await?;
            if !reserved {
                let (available, _total) =
                    AssetsRepository::stock_levels(&mut tx, line.asset_id).await?;
                tx.rollback().await?;
                return Err(AppError::InsufficientStock {
                    asset_id: line.asset_id,
                    requested: line.requested_quantity,
                    available,
                });
            }
        }

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(loan_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Reject a pending loan. No stock was ever taken, so none moves.
    pub async fn reject(&self, loan_id: i32, approver_id: i32, reason: &str) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE loans SET status = 'rejected', approver_id = $2, rejection_reason = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(loan_id)
        .bind(approver_id)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::status_conflict(&mut tx, loan_id, "reject").await?);
        }

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(loan_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Cancel (hard-delete) a pending loan; line items go with it via cascade
    pub async fn cancel(&self, loan_id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM loans WHERE id = $1 AND status = 'pending'")
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::status_conflict(&mut tx, loan_id, "cancel").await?);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count overdue loans (active past their due date)
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE status = 'active' AND due_date < CURRENT_DATE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// A conditional status UPDATE matched no row: tell the caller whether
    /// the loan is missing or merely in the wrong state.
    async fn status_conflict(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        loan_id: i32,
        operation: &str,
    ) -> AppResult<AppError> {
        let status: Option<LoanStatus> =
            sqlx::query_scalar("SELECT status FROM loans WHERE id = $1")
                .bind(loan_id)
                .fetch_optional(&mut **tx)
                .await?;
        Ok(match status {
            None => AppError::NotFound(format!("Loan {} not found", loan_id)),
            Some(s) => AppError::StateConflict(format!(
                "Cannot {} loan {} in status '{}'",
                operation, loan_id, s
            )),
        })
    }
}

#[derive(sqlx::FromRow)]
struct LineWithAsset {
    id: i32,
    loan_id: i32,
    asset_id: i32,
    requested_quantity: i32,
    condition_at_request: ConditionGrade,
    note: Option<String>,
    asset_name: String,
    inspected: bool,
}

impl LineWithAsset {
    fn into_details(self) -> LoanLineDetails {
        LoanLineDetails {
            line: LoanLineItem {
                id: self.id,
                loan_id: self.loan_id,
                asset_id: self.asset_id,
                requested_quantity: self.requested_quantity,
                condition_at_request: self.condition_at_request,
                note: self.note,
            },
            asset_name: self.asset_name,
            inspected: self.inspected,
        }
    }
}
