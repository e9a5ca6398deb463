//! Loan request manager — submission and queries

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

use super::audit::AuditService;
use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        loan::{CreateLoan, Loan, LoanDetails, RequestedLine},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    audit: AuditService,
    lending: LendingConfig,
}

impl LoansService {
    pub fn new(repository: Repository, audit: AuditService, lending: LendingConfig) -> Self {
        Self {
            repository,
            audit,
            lending,
        }
    }

    /// Submit a loan request: validate dates and lines, snapshot asset
    /// conditions, create the pending loan. Nothing is reserved here — the
    /// stock pre-check is advisory and the binding check happens at approval.
    pub async fn submit(&self, requester_id: i32, request: CreateLoan) -> AppResult<LoanDetails> {
        self.repository.users.get_by_id(requester_id).await?;

        let disallowed = parse_weekdays(&self.lending.disallowed_weekdays);
        validate_dates(request.start_date, request.due_date, &disallowed)?;
        validate_lines(&request.lines)?;

        let mut snapshots = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let asset = self.repository.assets.get_by_id(line.asset_id).await?;
            if !asset.is_active {
                return Err(AppError::Validation(format!(
                    "Asset {} is inactive and cannot be requested",
                    asset.id
                )));
            }
            // Advisory pre-check; approval re-checks atomically
            if line.quantity > asset.available_units {
                return Err(AppError::Validation(format!(
                    "Requested {} units of asset {} but only {} are available",
                    line.quantity, asset.id, asset.available_units
                )));
            }
            snapshots.push((
                line.asset_id,
                line.quantity,
                asset.condition_grade,
                line.note.clone(),
            ));
        }

        let code = generate_code(&self.lending.loan_code_prefix, request.start_date);
        let loan = self
            .repository
            .loans
            .create(
                &code,
                requester_id,
                request.start_date,
                request.due_date,
                request.purpose.as_deref(),
                &snapshots,
            )
            .await?;

        self.audit.record(
            requester_id,
            "submit",
            "loans",
            None,
            serde_json::to_value(&loan).ok(),
        );

        self.repository.loans.get_details(loan.id).await
    }

    /// Loan with line items and overdue flag
    pub async fn get_details(&self, loan_id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(loan_id).await
    }

    /// List loans, optionally filtered by status
    pub async fn list(&self, status: Option<LoanStatus>) -> AppResult<Vec<Loan>> {
        self.repository.loans.list(status).await
    }

    /// Loans of a requester
    pub async fn get_user_loans(&self, requester_id: i32) -> AppResult<Vec<Loan>> {
        self.repository.users.get_by_id(requester_id).await?;
        self.repository.loans.get_user_loans(requester_id).await
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.loans.count_active().await
    }

    /// Count overdue loans
    pub async fn count_overdue(&self) -> AppResult<i64> {
        self.repository.loans.count_overdue().await
    }
}

/// Map configured weekday names onto chrono weekdays; unknown names are
/// ignored rather than treated as always-blocked days
fn parse_weekdays(names: &[String]) -> Vec<Weekday> {
    names
        .iter()
        .filter_map(|name| match name.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Some(Weekday::Mon),
            "tuesday" | "tue" => Some(Weekday::Tue),
            "wednesday" | "wed" => Some(Weekday::Wed),
            "thursday" | "thu" => Some(Weekday::Thu),
            "friday" | "fri" => Some(Weekday::Fri),
            "saturday" | "sat" => Some(Weekday::Sat),
            "sunday" | "sun" => Some(Weekday::Sun),
            _ => None,
        })
        .collect()
}

fn validate_dates(start: NaiveDate, due: NaiveDate, disallowed: &[Weekday]) -> AppResult<()> {
    if due < start {
        return Err(AppError::Validation(format!(
            "Due date {} is before start date {}",
            due, start
        )));
    }
    for (label, date) in [("Start", start), ("Due", due)] {
        if disallowed.contains(&date.weekday()) {
            return Err(AppError::Validation(format!(
                "{} date {} falls on a disallowed day ({})",
                label,
                date,
                date.weekday()
            )));
        }
    }
    Ok(())
}

fn validate_lines(lines: &[RequestedLine]) -> AppResult<()> {
    if lines.is_empty() {
        return Err(AppError::Validation(
            "A loan request needs at least one line item".to_string(),
        ));
    }
    for line in lines {
        if line.quantity < 1 {
            return Err(AppError::Validation(format!(
                "Requested quantity for asset {} must be at least 1",
                line.asset_id
            )));
        }
    }
    // One line item per asset per loan
    let mut seen = std::collections::HashSet::new();
    for line in lines {
        if !seen.insert(line.asset_id) {
            return Err(AppError::Validation(format!(
                "Asset {} appears on more than one line item",
                line.asset_id
            )));
        }
    }
    Ok(())
}

/// Human-readable loan code; the DB unique constraint catches the rare collision
fn generate_code(prefix: &str, start_date: NaiveDate) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}-{}-{:06}", prefix, start_date.format("%y%m%d"), suffix)
}
