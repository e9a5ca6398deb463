//! Returns repository — reconciliation and stock release

use sqlx::{Pool, Postgres};

use super::assets::AssetsRepository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        return_record::{ReturnDetail, ReturnDetails, ReturnRecord, ReturnSplit},
    },
};

#[derive(Clone)]
pub struct ReturnsRepository {
    pool: Pool<Postgres>,
}

impl ReturnsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Apply a validated return: status flip, record + details, stock release.
    ///
    /// One transaction covers the whole thing. The conditional status UPDATE
    /// runs first and doubles as the row lock on the loan; if any later step
    /// fails the transaction rolls back, so "stock released but loan still
    /// active" (or the reverse) can never persist. Splits must already sum to
    /// the issued quantities — the caller validates against the immutable
    /// line items before calling in.
    pub async fn submit(
        &self,
        loan_id: i32,
        officer_id: i32,
        splits: &[ReturnSplit],
        aggregate_note: Option<&str>,
    ) -> AppResult<ReturnDetails> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE loans SET status = 'returned', returned_at = NOW()
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(loan_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let status: Option<LoanStatus> =
                sqlx::query_scalar("SELECT status FROM loans WHERE id = $1")
                    .bind(loan_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(match status {
                None => AppError::NotFound(format!("Loan {} not found", loan_id)),
                Some(s) => AppError::StateConflict(format!(
                    "Cannot return loan {} in status '{}'",
                    loan_id, s
                )),
            });
        }

        let record = sqlx::query_as::<_, ReturnRecord>(
            r#"
            INSERT INTO return_records (loan_id, officer_id, returned_at, note)
            VALUES ($1, $2, NOW(), $3)
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(officer_id)
        .bind(aggregate_note)
        .fetch_one(&mut *tx)
        .await?;

        let mut details = Vec::with_capacity(splits.len());
        for split in splits {
            let detail = sqlx::query_as::<_, ReturnDetail>(
                r#"
                INSERT INTO return_details
                    (return_id, asset_id, returned_quantity, condition, description, damage_detected, damage_severity)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(record.id)
            .bind(split.asset_id)
            .bind(split.quantity)
            .bind(split.condition)
            .bind(&split.note)
            .bind(split.condition.damage_detected())
            .bind(split.condition.damage_severity())
            .fetch_one(&mut *tx)
            .await?;
            details.push(detail);

            // Lost units stay off the shelf
            if split.condition.releases_stock() {
                let released =
                    AssetsRepository::adjust_stock(&mut tx, split.asset_id, split.quantity).await?;
                if !released {
                    tx.rollback().await?;
                    return Err(AppError::StateConflict(format!(
                        "Releasing {} units of asset {} would exceed its total stock",
                        split.quantity, split.asset_id
                    )));
                }
            }
        }

        tx.commit().await?;
        Ok(ReturnDetails { record, details })
    }

    /// The return event of a loan, if one was recorded
    pub async fn get_for_loan(&self, loan_id: i32) -> AppResult<Option<ReturnDetails>> {
        let record = sqlx::query_as::<_, ReturnRecord>(
            "SELECT * FROM return_records WHERE loan_id = $1",
        )
        .bind(loan_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        let details = sqlx::query_as::<_, ReturnDetail>(
            "SELECT * FROM return_details WHERE return_id = $1 ORDER BY id",
        )
        .bind(record.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ReturnDetails { record, details }))
    }
}
