//! Checklist template endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::checklist::{ChecklistTemplateItem, CreateTemplateItem},
};

use super::validate_body;

/// List the active checklist prompts of a category, in sequence order
#[utoipa::path(
    get,
    path = "/categories/{id}/checklist",
    tag = "checklists",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Active prompts", body = Vec<ChecklistTemplateItem>),
        (status = 404, description = "Category not found")
    )
)]
pub async fn list_checklist(
    State(state): State<crate::AppState>,
    Path(category_id): Path<i32>,
) -> AppResult<Json<Vec<ChecklistTemplateItem>>> {
    let items = state.services.checklists.list(category_id).await?;
    Ok(Json(items))
}

/// Append a prompt to a category's checklist
#[utoipa::path(
    post,
    path = "/categories/{id}/checklist",
    tag = "checklists",
    request_body = CreateTemplateItem,
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 201, description = "Prompt appended", body = ChecklistTemplateItem),
        (status = 404, description = "Category not found")
    )
)]
pub async fn append_checklist_item(
    State(state): State<crate::AppState>,
    Path(category_id): Path<i32>,
    Json(request): Json<CreateTemplateItem>,
) -> AppResult<(StatusCode, Json<ChecklistTemplateItem>)> {
    validate_body(&request)?;
    let item = state
        .services
        .checklists
        .append(category_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Soft-delete a checklist prompt
#[utoipa::path(
    delete,
    path = "/checklist-items/{id}",
    tag = "checklists",
    params(("id" = i32, Path, description = "Checklist template item ID")),
    responses(
        (status = 204, description = "Prompt deactivated"),
        (status = 404, description = "Prompt not found or already inactive")
    )
)]
pub async fn delete_checklist_item(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.checklists.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
