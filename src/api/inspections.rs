//! Pre-issue inspection endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::inspection::{CreateInspection, InspectionDetails},
};

use super::{validate_body, Actor};

/// Record the pre-issue inspection of a loan line item. When the last line
/// item of the loan is inspected the loan becomes active.
#[utoipa::path(
    post,
    path = "/line-items/{id}/inspection",
    tag = "inspections",
    request_body = CreateInspection,
    params(
        ("id" = i32, Path, description = "Loan line item ID"),
        ("x-actor-id" = i32, Header, description = "Inspecting user")
    ),
    responses(
        (status = 201, description = "Inspection recorded", body = InspectionDetails),
        (status = 400, description = "Empty template without confirmation"),
        (status = 404, description = "Line item not found"),
        (status = 409, description = "Loan not approved or line already inspected")
    )
)]
pub async fn record_inspection(
    State(state): State<crate::AppState>,
    Actor(inspector_id): Actor,
    Path(line_item_id): Path<i32>,
    Json(request): Json<CreateInspection>,
) -> AppResult<(StatusCode, Json<InspectionDetails>)> {
    validate_body(&request)?;
    let details = state
        .services
        .inspections
        .record(line_item_id, inspector_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// List the inspections of a loan
#[utoipa::path(
    get,
    path = "/loans/{id}/inspections",
    tag = "inspections",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Inspections with answers", body = Vec<InspectionDetails>),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan_inspections(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<Vec<InspectionDetails>>> {
    let inspections = state.services.inspections.list_for_loan(loan_id).await?;
    Ok(Json(inspections))
}
