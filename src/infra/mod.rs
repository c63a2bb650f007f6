//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and migrations
//! - Repositories per aggregate
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AccountRepository, AccountStore, CatalogRepository, CatalogStore, NewAccountRecord,
    PatientRepository, PatientStore, RecordRepository, RecordStore, StaffRepository, StaffStore,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAccountRepository, MockCatalogRepository, MockPatientRepository, MockRecordRepository,
    MockStaffRepository,
};
