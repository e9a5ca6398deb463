//! Repository layer for database operations

pub mod assets;
pub mod audit;
pub mod checklists;
pub mod inspections;
pub mod loans;
pub mod reference;
pub mod returns;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub assets: assets::AssetsRepository,
    pub loans: loans::LoansRepository,
    pub inspections: inspections::InspectionsRepository,
    pub returns: returns::ReturnsRepository,
    pub checklists: checklists::ChecklistsRepository,
    pub reference: reference::ReferenceRepository,
    pub users: users::UsersRepository,
    pub audit: audit::AuditRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            assets: assets::AssetsRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            inspections: inspections::InspectionsRepository::new(pool.clone()),
            returns: returns::ReturnsRepository::new(pool.clone()),
            checklists: checklists::ChecklistsRepository::new(pool.clone()),
            reference: reference::ReferenceRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            audit: audit::AuditRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip a trivial query, verifying the database is reachable
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
