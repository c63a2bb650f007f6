//! Clinic - a clinic management backend
//!
//! Staff and their schedules, the service catalog, patient cards,
//! appointments and medical tests, served over a role-gated REST API.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Clinic entities, inputs and display strings
//! - **policy**: Role groups and the access policy
//! - **services**: Use cases, each authorized before it touches storage
//! - **infra**: Database, migrations, repositories and unit of work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! clinic serve
//!
//! # Run migrations
//! clinic migrate up
//!
//! # Create the first administrator
//! clinic create-admin --username admin --password 'SecurePass123!'
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod policy;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Role};
pub use errors::{AppError, AppResult};
pub use policy::Principal;
