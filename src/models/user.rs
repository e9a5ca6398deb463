//! User model — attribution records only, authentication lives upstream

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::UserRole;

/// User record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub role: UserRole,
    pub email: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Create user request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub role: UserRole,
    #[validate(email)]
    pub email: Option<String>,
}
