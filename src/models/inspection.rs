//! Pre-issue inspection model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ConditionGrade;

/// Inspection record, 1:1 with a loan line item. Never updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Inspection {
    pub id: i32,
    pub line_item_id: i32,
    pub overall_condition: ConditionGrade,
    pub note: Option<String>,
    /// Opaque reference into the binary storage service; upload happens upstream
    pub photo_ref: Option<String>,
    pub inspector_id: i32,
    pub crea_date: Option<DateTime<Utc>>,
}

/// One checklist answer within an inspection, kept in sequence order.
/// A blank checklist built from the category template carries no grade yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChecklistAnswer {
    pub id: i32,
    pub inspection_id: i32,
    pub seq: i32,
    pub prompt: String,
    pub condition_grade: Option<ConditionGrade>,
    pub note: Option<String>,
}

/// Inspection with its answers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InspectionDetails {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub answers: Vec<ChecklistAnswer>,
}

/// One supplied checklist answer
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct AnswerInput {
    #[validate(length(min = 1, max = 500))]
    pub prompt: String,
    pub condition_grade: Option<ConditionGrade>,
    pub note: Option<String>,
}

/// Record inspection request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateInspection {
    pub overall_condition: ConditionGrade,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
    pub photo_ref: Option<String>,
    /// Answers; when absent the checklist is built from the category template
    #[validate(nested)]
    pub answers: Option<Vec<AnswerInput>>,
    /// Required acknowledgement when the category template is empty and no
    /// answers were supplied
    #[serde(default)]
    pub confirm_empty_checklist: bool,
}
