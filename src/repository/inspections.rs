//! Inspections repository — pre-issue condition records and the issuance gate

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ConditionGrade, LoanStatus},
        inspection::{ChecklistAnswer, Inspection, InspectionDetails},
    },
};

/// Answer row ready for insertion, already sequenced
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub seq: i32,
    pub prompt: String,
    pub condition_grade: Option<ConditionGrade>,
    pub note: Option<String>,
}

#[derive(Clone)]
pub struct InspectionsRepository {
    pool: Pool<Postgres>,
}

impl InspectionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Existing inspection for a line item, if any
    pub async fn get_by_line_item(&self, line_item_id: i32) -> AppResult<Option<Inspection>> {
        let row = sqlx::query_as::<_, Inspection>(
            "SELECT * FROM inspections WHERE line_item_id = $1",
        )
        .bind(line_item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Record an inspection for a line item and recompute the issuance gate.
    ///
    /// Everything happens in one transaction. The loan row is locked first:
    /// that serializes inspections of sibling line items, so the recount at
    /// the end always sees every committed inspection, and the conditional
    /// `approved -> active` UPDATE fires exactly once no matter the order in
    /// which line items are inspected.
    ///
    /// Returns the inserted inspection and whether the loan became active.
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        loan_id: i32,
        line_item_id: i32,
        inspector_id: i32,
        overall_condition: ConditionGrade,
        note: Option<&str>,
        photo_ref: Option<&str>,
        answers: &[NewAnswer],
    ) -> AppResult<(InspectionDetails, bool)> {
        let mut tx = self.pool.begin().await?;

        let status: Option<LoanStatus> =
            sqlx::query_scalar("SELECT status FROM loans WHERE id = $1 FOR UPDATE")
                .bind(loan_id)
                .fetch_optional(&mut *tx)
                .await?;

        match status {
            None => return Err(AppError::NotFound(format!("Loan {} not found", loan_id))),
            Some(LoanStatus::Approved) => {}
            Some(s) => {
                return Err(AppError::StateConflict(format!(
                    "Cannot inspect line items of loan {} in status '{}'",
                    loan_id, s
                )))
            }
        }

        let already: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM inspections WHERE line_item_id = $1)",
        )
        .bind(line_item_id)
        .fetch_one(&mut *tx)
        .await?;
        if already {
            return Err(AppError::StateConflict(format!(
                "Line item {} has already been inspected",
                line_item_id
            )));
        }

        let inspection = sqlx::query_as::<_, Inspection>(
            r#"
            INSERT INTO inspections (line_item_id, overall_condition, note, photo_ref, inspector_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(line_item_id)
        .bind(overall_condition)
        .bind(note)
        .bind(photo_ref)
        .bind(inspector_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut inserted = Vec::with_capacity(answers.len());
        for answer in answers {
            let row = sqlx::query_as::<_, ChecklistAnswer>(
                r#"
                INSERT INTO inspection_answers (inspection_id, seq, prompt, condition_grade, note)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(inspection.id)
            .bind(answer.seq)
            .bind(&answer.prompt)
            .bind(answer.condition_grade)
            .bind(&answer.note)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        // Derived transition: recount after every insert, flip when complete
        let total_lines: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loan_line_items WHERE loan_id = $1")
                .bind(loan_id)
                .fetch_one(&mut *tx)
                .await?;
        let inspected: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM inspections i
            JOIN loan_line_items li ON li.id = i.line_item_id
            WHERE li.loan_id = $1
            "#,
        )
        .bind(loan_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut activated = false;
        if inspected == total_lines {
            let result =
                sqlx::query("UPDATE loans SET status = 'active' WHERE id = $1 AND status = 'approved'")
                    .bind(loan_id)
                    .execute(&mut *tx)
                    .await?;
            activated = result.rows_affected() == 1;
        }

        tx.commit().await?;

        Ok((
            InspectionDetails {
                inspection,
                answers: inserted,
            },
            activated,
        ))
    }

    /// All inspections of a loan with their answers, in line-item order
    pub async fn list_for_loan(&self, loan_id: i32) -> AppResult<Vec<InspectionDetails>> {
        let inspections = sqlx::query_as::<_, Inspection>(
            r#"
            SELECT i.* FROM inspections i
            JOIN loan_line_items li ON li.id = i.line_item_id
            WHERE li.loan_id = $1
            ORDER BY li.id
            "#,
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(inspections.len());
        for inspection in inspections {
            let answers = sqlx::query_as::<_, ChecklistAnswer>(
                "SELECT * FROM inspection_answers WHERE inspection_id = $1 ORDER BY seq",
            )
            .bind(inspection.id)
            .fetch_all(&self.pool)
            .await?;
            result.push(InspectionDetails { inspection, answers });
        }
        Ok(result)
    }
}
