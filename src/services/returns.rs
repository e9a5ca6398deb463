//! Return reconciliation engine
//!
//! Splits the returned quantity of each line item across condition buckets,
//! checks the split totals against what was issued, releases non-lost stock
//! and closes the loan. Validation happens against the immutable line items
//! before any write; the write itself is a single transaction in the
//! repository, so a rejected submission leaves everything untouched.

use std::collections::HashMap;

use super::audit::AuditService;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        loan::LoanLineItem,
        return_record::{CreateReturn, ReturnDetails, ReturnSplit},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReturnsService {
    repository: Repository,
    audit: AuditService,
}

impl ReturnsService {
    pub fn new(repository: Repository, audit: AuditService) -> Self {
        Self { repository, audit }
    }

    /// Submit the return of an active loan
    pub async fn submit(
        &self,
        loan_id: i32,
        officer_id: i32,
        request: CreateReturn,
    ) -> AppResult<ReturnDetails> {
        self.repository.users.get_by_id(officer_id).await?;

        let loan = self.repository.loans.get_by_id(loan_id).await?;
        if loan.status != LoanStatus::Active {
            return Err(AppError::StateConflict(format!(
                "Cannot return loan {} in status '{}'",
                loan_id, loan.status
            )));
        }

        let lines = self.repository.loans.get_lines(loan_id).await?;
        reconcile_splits(&lines, &request.splits)?;
        let note = aggregate_note(&request.splits);

        let details = self
            .repository
            .returns
            .submit(loan_id, officer_id, &request.splits, note.as_deref())
            .await?;

        tracing::info!(loan = loan_id, officer = officer_id, "loan returned");
        self.audit.record(
            officer_id,
            "return",
            "returns",
            serde_json::to_value(&loan).ok(),
            serde_json::to_value(&details).ok(),
        );
        Ok(details)
    }

    /// The recorded return of a loan
    pub async fn get_for_loan(&self, loan_id: i32) -> AppResult<ReturnDetails> {
        self.repository.loans.get_by_id(loan_id).await?;
        self.repository
            .returns
            .get_for_loan(loan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {} has no return record", loan_id)))
    }
}

/// Check the submitted splits against the issued line items: every split
/// quantity positive, every referenced asset on the loan, and per asset the
/// split total equal to the requested quantity. Any failure rejects the
/// whole submission.
fn reconcile_splits(lines: &[LoanLineItem], splits: &[ReturnSplit]) -> AppResult<()> {
    if splits.is_empty() {
        return Err(AppError::Validation(
            "A return needs at least one split".to_string(),
        ));
    }
    for split in splits {
        if split.quantity < 1 {
            return Err(AppError::Validation(format!(
                "Returned quantity for asset {} must be at least 1",
                split.asset_id
            )));
        }
    }

    let requested: HashMap<i32, i32> = lines
        .iter()
        .map(|line| (line.asset_id, line.requested_quantity))
        .collect();

    let mut returned: HashMap<i32, i32> = HashMap::new();
    for split in splits {
        *returned.entry(split.asset_id).or_insert(0) += split.quantity;
    }

    // Splits for assets that were never issued
    for split in splits {
        if !requested.contains_key(&split.asset_id) {
            return Err(AppError::QuantityMismatch {
                asset_id: split.asset_id,
                returned: returned[&split.asset_id],
                requested: 0,
            });
        }
    }

    // Every issued line must be fully accounted for, no more, no less
    for line in lines {
        let total = returned.get(&line.asset_id).copied().unwrap_or(0);
        if total != line.requested_quantity {
            return Err(AppError::QuantityMismatch {
                asset_id: line.asset_id,
                returned: total,
                requested: line.requested_quantity,
            });
        }
    }

    Ok(())
}

/// Fold the split notes into one free-text note, order preserved and each
/// entry tagged by condition and quantity
fn aggregate_note(splits: &[ReturnSplit]) -> Option<String> {
    let parts: Vec<String> = splits
        .iter()
        .filter_map(|split| {
            split
                .note
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .map(|n| format!("[{} x{}] {}", split.condition, split.quantity, n.trim()))
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{ConditionGrade, ReturnCondition};

    fn line(asset_id: i32, requested_quantity: i32) -> LoanLineItem {
        LoanLineItem {
            id: asset_id * 100,
            loan_id: 1,
            asset_id,
            requested_quantity,
            condition_at_request: ConditionGrade::Good,
            note: None,
        }
    }

    fn split(asset_id: i32, quantity: i32, condition: ReturnCondition) -> ReturnSplit {
        ReturnSplit {
            asset_id,
            quantity,
            condition,
            note: None,
        }
    }

    #[test]
    fn exact_split_across_conditions_passes() {
        let lines = vec![line(1, 3)];
        let splits = vec![
            split(1, 2, ReturnCondition::Good),
            split(1, 1, ReturnCondition::Damaged),
        ];
        assert!(reconcile_splits(&lines, &splits).is_ok());
    }

    #[test]
    fn short_return_is_a_quantity_mismatch() {
        let lines = vec![line(1, 3)];
        let splits = vec![split(1, 2, ReturnCondition::Good)];
        match reconcile_splits(&lines, &splits).unwrap_err() {
            AppError::QuantityMismatch {
                asset_id,
                returned,
                requested,
            } => {
                assert_eq!(asset_id, 1);
                assert_eq!(returned, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("expected QuantityMismatch, got {:?}", other),
        }
    }

    #[test]
    fn over_return_is_a_quantity_mismatch() {
        let lines = vec![line(1, 3)];
        let splits = vec![
            split(1, 3, ReturnCondition::Good),
            split(1, 1, ReturnCondition::Lost),
        ];
        assert!(matches!(
            reconcile_splits(&lines, &splits),
            Err(AppError::QuantityMismatch {
                returned: 4,
                requested: 3,
                ..
            })
        ));
    }

    #[test]
    fn split_for_unissued_asset_is_rejected() {
        let lines = vec![line(1, 2)];
        let splits = vec![
            split(1, 2, ReturnCondition::Good),
            split(9, 1, ReturnCondition::Good),
        ];
        assert!(matches!(
            reconcile_splits(&lines, &splits),
            Err(AppError::QuantityMismatch {
                asset_id: 9,
                requested: 0,
                ..
            })
        ));
    }

    #[test]
    fn line_with_no_splits_is_rejected() {
        let lines = vec![line(1, 2), line(2, 1)];
        let splits = vec![split(1, 2, ReturnCondition::Good)];
        assert!(matches!(
            reconcile_splits(&lines, &splits),
            Err(AppError::QuantityMismatch {
                asset_id: 2,
                returned: 0,
                requested: 1,
            })
        ));
    }

    #[test]
    fn non_positive_split_quantity_is_a_validation_error() {
        let lines = vec![line(1, 2)];
        let splits = vec![
            split(1, 0, ReturnCondition::Good),
            split(1, 2, ReturnCondition::Good),
        ];
        assert!(matches!(
            reconcile_splits(&lines, &splits),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn empty_submission_is_a_validation_error() {
        let lines = vec![line(1, 2)];
        assert!(matches!(
            reconcile_splits(&lines, &[]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn multi_line_loan_reconciles_per_asset() {
        let lines = vec![line(1, 2), line(2, 3)];
        let splits = vec![
            split(2, 1, ReturnCondition::Lost),
            split(1, 2, ReturnCondition::Good),
            split(2, 2, ReturnCondition::Defective),
        ];
        assert!(reconcile_splits(&lines, &splits).is_ok());
    }

    #[test]
    fn notes_are_aggregated_in_order_with_tags() {
        let splits = vec![
            ReturnSplit {
                asset_id: 1,
                quantity: 2,
                condition: ReturnCondition::Good,
                note: Some("all fine".into()),
            },
            ReturnSplit {
                asset_id: 1,
                quantity: 1,
                condition: ReturnCondition::Damaged,
                note: Some("cracked casing".into()),
            },
        ];
        assert_eq!(
            aggregate_note(&splits).as_deref(),
            Some("[good x2] all fine; [damaged x1] cracked casing")
        );
    }

    #[test]
    fn blank_notes_yield_no_aggregate() {
        let splits = vec![
            split(1, 2, ReturnCondition::Good),
            ReturnSplit {
                asset_id: 1,
                quantity: 1,
                condition: ReturnCondition::Lost,
                note: Some("   ".into()),
            },
        ];
        assert_eq!(aggregate_note(&splits), None);
    }
}
