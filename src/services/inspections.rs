//! Pre-issue inspection gate
//!
//! Records the condition checklist for a line item while the loan is
//! approved. Once every line item of the loan carries an inspection the
//! loan becomes active; that transition is derived by recount, not by a
//! separate trigger, so inspecting line items in any order fires it once.

use super::audit::AuditService;
use crate::{
    error::{AppError, AppResult},
    models::{
        checklist::ChecklistTemplateItem,
        enums::LoanStatus,
        inspection::{AnswerInput, CreateInspection, InspectionDetails},
    },
    repository::{inspections::NewAnswer, Repository},
};

#[derive(Clone)]
pub struct InspectionsService {
    repository: Repository,
    audit: AuditService,
}

impl InspectionsService {
    pub fn new(repository: Repository, audit: AuditService) -> Self {
        Self { repository, audit }
    }

    /// Record an inspection for a loan line item
    pub async fn record(
        &self,
        line_item_id: i32,
        inspector_id: i32,
        request: CreateInspection,
    ) -> AppResult<InspectionDetails> {
        self.repository.users.get_by_id(inspector_id).await?;

        let line = self.repository.loans.get_line(line_item_id).await?;
        let loan = self.repository.loans.get_by_id(line.loan_id).await?;
        if loan.status != LoanStatus::Approved {
            return Err(AppError::StateConflict(format!(
                "Cannot inspect line items of loan {} in status '{}'",
                loan.id, loan.status
            )));
        }
        if self
            .repository
            .inspections
            .get_by_line_item(line_item_id)
            .await?
            .is_some()
        {
            return Err(AppError::StateConflict(format!(
                "Line item {} has already been inspected",
                line_item_id
            )));
        }

        let answers = match request.answers.as_deref() {
            Some(supplied) if !supplied.is_empty() => sequence_answers(supplied),
            _ => {
                let asset = self.repository.assets.get_by_id(line.asset_id).await?;
                let template = self
                    .repository
                    .checklists
                    .list_active(asset.category_id)
                    .await?;
                if template.is_empty() && !request.confirm_empty_checklist {
                    return Err(AppError::Validation(format!(
                        "Category {} has no checklist template; set confirm_empty_checklist to proceed without one",
                        asset.category_id
                    )));
                }
                blank_answers(&template)
            }
        };

        let (details, activated) = self
            .repository
            .inspections
            .record(
                loan.id,
                line_item_id,
                inspector_id,
                request.overall_condition,
                request.note.as_deref(),
                request.photo_ref.as_deref(),
                &answers,
            )
            .await?;

        if activated {
            tracing::info!(loan = loan.id, "all line items inspected, loan active");
        }
        self.audit.record(
            inspector_id,
            "inspect",
            "inspections",
            None,
            serde_json::to_value(&details).ok(),
        );
        Ok(details)
    }

    /// Inspections of a loan with their answers
    pub async fn list_for_loan(&self, loan_id: i32) -> AppResult<Vec<InspectionDetails>> {
        self.repository.loans.get_by_id(loan_id).await?;
        self.repository.inspections.list_for_loan(loan_id).await
    }
}

/// Number supplied answers in the order the inspector gave them
fn sequence_answers(supplied: &[AnswerInput]) -> Vec<NewAnswer> {
    supplied
        .iter()
        .enumerate()
        .map(|(i, answer)| NewAnswer {
            seq: i as i32 + 1,
            prompt: answer.prompt.clone(),
            condition_grade: answer.condition_grade,
            note: answer.note.clone(),
        })
        .collect()
}

/// Blank checklist built from the category template, keeping template order
fn blank_answers(template: &[ChecklistTemplateItem]) -> Vec<NewAnswer> {
    template
        .iter()
        .map(|item| NewAnswer {
            seq: item.seq,
            prompt: item.prompt.clone(),
            condition_grade: None,
            note: None,
        })
        .collect()
}
