//! Shared request and response types.

mod pagination;
mod response;

pub use pagination::{
    AccountPage, DoctorPage, EmployeePage, OfficePage, Paginated, PaginationMeta,
    PaginationParams, PatientPage, PositionPage, SchedulePage, ServicePage, SpecializationPage,
};
pub use response::NoContent;
