//! Business logic services

pub mod approvals;
pub mod assets;
pub mod audit;
pub mod checklists;
pub mod inspections;
pub mod loans;
pub mod returns;
pub mod users;

use crate::{config::LendingConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub assets: assets::AssetsService,
    pub loans: loans::LoansService,
    pub approvals: approvals::ApprovalsService,
    pub inspections: inspections::InspectionsService,
    pub returns: returns::ReturnsService,
    pub checklists: checklists::ChecklistsService,
    pub users: users::UsersService,
    pub audit: audit::AuditService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, lending: LendingConfig) -> Self {
        let audit = audit::AuditService::new(repository.clone());
        Self {
            assets: assets::AssetsService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), audit.clone(), lending),
            approvals: approvals::ApprovalsService::new(repository.clone(), audit.clone()),
            inspections: inspections::InspectionsService::new(repository.clone(), audit.clone()),
            returns: returns::ReturnsService::new(repository.clone(), audit.clone()),
            checklists: checklists::ChecklistsService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            audit,
            repository,
        }
    }
}
