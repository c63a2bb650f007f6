//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AccountService, AuthService, CatalogService, PatientService, RecordService,
    ServiceContainer, Services, StaffService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication, sign-up and principal resolution
    pub auth_service: Arc<dyn AuthService>,
    pub account_service: Arc<dyn AccountService>,
    /// Positions, specializations, employees, schedules and doctors
    pub staff_service: Arc<dyn StaffService>,
    /// Offices, services and the overview
    pub catalog_service: Arc<dyn CatalogService>,
    pub patient_service: Arc<dyn PatientService>,
    /// Medical tests and appointments
    pub record_service: Arc<dyn RecordService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(&container, database)
    }

    /// Create application state from any service container.
    pub fn new(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            account_service: container.accounts(),
            staff_service: container.staff(),
            catalog_service: container.catalog(),
            patient_service: container.patients(),
            record_service: container.records(),
            database,
        }
    }
}
