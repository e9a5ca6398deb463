//! Loan lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        enums::LoanStatus,
        loan::{CreateLoan, Loan, LoanDetails, RejectLoan},
    },
};

use super::{validate_body, Actor};

/// Loan list filter
#[derive(Deserialize, IntoParams)]
pub struct LoanListQuery {
    /// Restrict to one lifecycle status
    pub status: Option<LoanStatus>,
}

/// Submit a loan request
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    params(("x-actor-id" = i32, Header, description = "Requesting user")),
    responses(
        (status = 201, description = "Loan created in pending state", body = LoanDetails),
        (status = 400, description = "Invalid quantities, dates or duplicate assets"),
        (status = 404, description = "Requester or asset not found")
    )
)]
pub async fn submit_loan(
    State(state): State<crate::AppState>,
    Actor(requester_id): Actor,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanDetails>)> {
    validate_body(&request)?;
    let details = state.services.loans.submit(requester_id, request).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// List loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanListQuery),
    responses(
        (status = 200, description = "Loans, newest first", body = Vec<Loan>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanListQuery>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.list(query.status).await?;
    Ok(Json(loans))
}

/// Get a loan with its line items
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    let details = state.services.loans.get_details(loan_id).await?;
    Ok(Json(details))
}

/// Get loans for a specific user
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's loans", body = Vec<Loan>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.get_user_loans(user_id).await?;
    Ok(Json(loans))
}

/// Approve a pending loan, reserving stock for all line items atomically
#[utoipa::path(
    post,
    path = "/loans/{id}/approve",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID"),
        ("x-actor-id" = i32, Header, description = "Approving user")
    ),
    responses(
        (status = 200, description = "Loan approved, stock reserved", body = Loan),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Wrong status or insufficient stock")
    )
)]
pub async fn approve_loan(
    State(state): State<crate::AppState>,
    Actor(approver_id): Actor,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.approvals.approve(loan_id, approver_id).await?;
    Ok(Json(loan))
}

/// Reject a pending loan
#[utoipa::path(
    post,
    path = "/loans/{id}/reject",
    tag = "loans",
    request_body = RejectLoan,
    params(
        ("id" = i32, Path, description = "Loan ID"),
        ("x-actor-id" = i32, Header, description = "Rejecting user")
    ),
    responses(
        (status = 200, description = "Loan rejected", body = Loan),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not pending")
    )
)]
pub async fn reject_loan(
    State(state): State<crate::AppState>,
    Actor(approver_id): Actor,
    Path(loan_id): Path<i32>,
    Json(request): Json<RejectLoan>,
) -> AppResult<Json<Loan>> {
    validate_body(&request)?;
    let loan = state
        .services
        .approvals
        .reject(loan_id, approver_id, &request.reason)
        .await?;
    Ok(Json(loan))
}

/// Cancel (delete) a pending loan
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID"),
        ("x-actor-id" = i32, Header, description = "Cancelling user")
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not pending")
    )
)]
pub async fn cancel_loan(
    State(state): State<crate::AppState>,
    Actor(actor_id): Actor,
    Path(loan_id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.approvals.cancel(loan_id, actor_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
