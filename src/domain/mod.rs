//! Domain layer - Clinic entities, value objects and input payloads.
//!
//! Types here are storage-agnostic. Display strings are composed from the
//! related records a caller loads alongside an entity.

pub mod account;
pub mod catalog;
pub mod password;
pub mod patient;
pub mod record;
pub mod role;
pub mod staff;
pub mod validation;

pub use account::{Account, AccountResponse, AccountUpdate, NewAccount};
pub use catalog::{Office, OfficeInput, Overview, Service, ServiceDetails, ServiceInput};
pub use password::Password;
pub use patient::{Patient, PatientInput, PatientRecord, SignUp};
pub use record::{
    Appointment, AppointmentDetails, AppointmentInput, MedicalTest, MedicalTestDetails,
    MedicalTestInput,
};
pub use role::Role;
pub use staff::{
    Doctor, DoctorDetails, DoctorInput, Employee, EmployeeDetails, EmployeeInput, Gender,
    NameInput, Position, Schedule, ScheduleDetails, ScheduleInput, Specialization, Weekday,
};
pub use validation::{ensure_not_blank, validate_input};
