//! API handlers for Custodia REST endpoints

pub mod assets;
pub mod checklists;
pub mod health;
pub mod inspections;
pub mod loans;
pub mod openapi;
pub mod returns;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use validator::Validate;

use crate::{error::AppError, AppResult, AppState};

/// Header carrying the acting user's identity, resolved by the upstream
/// identity service. Used for attribution only; authorization is enforced
/// before requests reach this server.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor for the acting user reference
pub struct Actor(pub i32);

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Validation("Missing X-Actor-Id header".to_string()))?;

        let actor_id = value
            .parse::<i32>()
            .map_err(|_| AppError::Validation("Invalid X-Actor-Id header".to_string()))?;

        Ok(Actor(actor_id))
    }
}

/// Run derive-level validation on a request body
pub(crate) fn validate_body<T: Validate>(body: &T) -> AppResult<()> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}
