//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! Every operation takes the caller's `Principal` and checks the access
//! policy before it touches a repository.

mod account_service;
mod auth_service;
mod catalog_service;
pub mod container;
mod patient_service;
mod record_service;
mod staff_service;

#[cfg(test)]
mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, Claims, SignUpResponse, TokenResponse};
pub use catalog_service::{CatalogManager, CatalogService};
pub use patient_service::{PatientManager, PatientService};
pub use record_service::{RecordManager, RecordService};
pub use staff_service::{StaffManager, StaffService};

// Parallel execution utilities
pub use container::parallel;
