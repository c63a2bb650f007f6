//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod account_repository;
mod base;
pub(crate) mod catalog_repository;
pub(crate) mod entities;
pub(crate) mod patient_repository;
mod record_repository;
pub(crate) mod staff_repository;

pub use account_repository::{AccountRepository, AccountStore, NewAccountRecord};
pub use catalog_repository::{CatalogRepository, CatalogStore};
pub use patient_repository::{PatientRepository, PatientStore};
pub use record_repository::{RecordRepository, RecordStore};
pub use staff_repository::{StaffRepository, StaffStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_repository::MockCatalogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use patient_repository::MockPatientRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use record_repository::MockRecordRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use staff_repository::MockStaffRepository;
