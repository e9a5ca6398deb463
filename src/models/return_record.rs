//! Return reconciliation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{DamageSeverity, ReturnCondition};

/// One return event per loan
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReturnRecord {
    pub id: i32,
    pub loan_id: i32,
    pub officer_id: i32,
    pub returned_at: DateTime<Utc>,
    /// Ordered aggregation of the split notes, tagged by condition and quantity
    pub note: Option<String>,
}

/// One condition-quantity split within a return
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReturnDetail {
    pub id: i32,
    pub return_id: i32,
    pub asset_id: i32,
    pub returned_quantity: i32,
    pub condition: ReturnCondition,
    pub description: Option<String>,
    pub damage_detected: bool,
    pub damage_severity: DamageSeverity,
}

/// Return record with its splits
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnDetails {
    #[serde(flatten)]
    pub record: ReturnRecord,
    pub details: Vec<ReturnDetail>,
}

/// One submitted split. Serialize is required by the length rule on
/// `CreateReturn.splits`, which echoes the offending value into the
/// validation error params.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct ReturnSplit {
    pub asset_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub condition: ReturnCondition,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Submit return request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateReturn {
    #[validate(length(min = 1), nested)]
    pub splits: Vec<ReturnSplit>,
}
