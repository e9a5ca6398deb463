//! Checklist template model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Ordered inspection prompt attached to a category. Soft-deleted items keep
/// their sequence number so existing inspections stay interpretable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChecklistTemplateItem {
    pub id: i32,
    pub category_id: i32,
    pub seq: i32,
    pub prompt: String,
    pub is_active: bool,
}

/// Append template item request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTemplateItem {
    #[validate(length(min = 1, max = 500))]
    pub prompt: String,
}
