//! Return reconciliation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::return_record::{CreateReturn, ReturnDetails},
};

use super::{validate_body, Actor};

/// Submit the return of an active loan as condition-tagged quantity splits
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "returns",
    request_body = CreateReturn,
    params(
        ("id" = i32, Path, description = "Loan ID"),
        ("x-actor-id" = i32, Header, description = "Return officer")
    ),
    responses(
        (status = 201, description = "Return recorded, stock released", body = ReturnDetails),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not active"),
        (status = 422, description = "Split totals do not match issued quantities")
    )
)]
pub async fn submit_return(
    State(state): State<crate::AppState>,
    Actor(officer_id): Actor,
    Path(loan_id): Path<i32>,
    Json(request): Json<CreateReturn>,
) -> AppResult<(StatusCode, Json<ReturnDetails>)> {
    validate_body(&request)?;
    let details = state
        .services
        .returns
        .submit(loan_id, officer_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// Get the return record of a loan
#[utoipa::path(
    get,
    path = "/loans/{id}/return",
    tag = "returns",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Return record with splits", body = ReturnDetails),
        (status = 404, description = "Loan or return record not found")
    )
)]
pub async fn get_return(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReturnDetails>> {
    let details = state.services.returns.get_for_loan(loan_id).await?;
    Ok(Json(details))
}
