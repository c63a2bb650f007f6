//! HTTP request handlers.

pub mod account_handler;
pub mod auth_handler;
pub mod catalog_handler;
pub mod patient_handler;
pub mod record_handler;
pub mod staff_handler;

pub use account_handler::account_routes;
pub use auth_handler::auth_routes;
pub use catalog_handler::{office_routes, overview, service_routes};
pub use patient_handler::patient_routes;
pub use record_handler::{appointment_routes, medical_test_routes};
pub use staff_handler::{
    doctor_routes, employee_routes, position_routes, schedule_routes, specialization_routes,
};
