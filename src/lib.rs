//! Custodia Equipment Lending Server
//!
//! A Rust implementation of the Custodia institutional lending server,
//! providing a REST JSON API over the loan lifecycle: request, approval
//! with stock reservation, pre-issue inspection, and condition-split
//! return reconciliation.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
