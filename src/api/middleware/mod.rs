//! API middleware.

mod auth;

pub use auth::principal_middleware;
