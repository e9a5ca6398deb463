//! Asset model — the borrowable item types whose stock the ledger tracks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ConditionGrade;

/// Asset record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Asset {
    pub id: i32,
    /// Asset name / description
    pub name: String,
    pub category_id: i32,
    pub location_id: Option<i32>,
    /// Units owned by the institution
    pub total_units: i32,
    /// Units currently on the shelf; 0 <= available_units <= total_units
    pub available_units: i32,
    /// Overall condition grade of the stock
    pub condition_grade: ConditionGrade,
    /// Inactive assets cannot appear on new loan requests
    pub is_active: bool,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create asset request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category_id: i32,
    pub location_id: Option<i32>,
    #[validate(range(min = 0))]
    pub total_units: i32,
    pub condition_grade: Option<ConditionGrade>,
    pub notes: Option<String>,
}

/// Update asset request. `total_units` changes shift `available_units` by the
/// same delta and are refused if that would strand issued stock.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    #[validate(range(min = 0))]
    pub total_units: Option<i32>,
    pub condition_grade: Option<ConditionGrade>,
    pub notes: Option<String>,
}
