//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, auth_handler, catalog_handler, patient_handler, record_handler,
    staff_handler,
};
use crate::domain::{
    AccountResponse, AccountUpdate, Appointment, AppointmentDetails, AppointmentInput, Doctor,
    DoctorDetails, DoctorInput, Employee, EmployeeDetails, EmployeeInput, Gender, MedicalTest,
    MedicalTestDetails, MedicalTestInput, NameInput, NewAccount, Office, OfficeInput, Overview,
    Patient, PatientInput, PatientRecord, Position, Role, Schedule, ScheduleDetails,
    ScheduleInput, Service, ServiceDetails, ServiceInput, SignUp, Specialization, Weekday,
};
use crate::services::{SignUpResponse, TokenResponse};
use crate::types::{
    AccountPage, DoctorPage, EmployeePage, OfficePage, PaginationMeta, PatientPage, PositionPage,
    SchedulePage, ServicePage, SpecializationPage,
};

/// OpenAPI documentation for the clinic API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clinic API",
        version = "0.1.0",
        description = "Clinic management: staff, service catalog, patient cards, appointments and medical tests"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        auth_handler::sign_up,
        // Accounts
        account_handler::list_accounts,
        account_handler::get_account,
        account_handler::create_account,
        account_handler::update_account,
        // Staff
        staff_handler::list_positions,
        staff_handler::get_position,
        staff_handler::create_position,
        staff_handler::update_position,
        staff_handler::delete_position,
        staff_handler::list_specializations,
        staff_handler::get_specialization,
        staff_handler::create_specialization,
        staff_handler::update_specialization,
        staff_handler::delete_specialization,
        staff_handler::list_employees,
        staff_handler::get_employee,
        staff_handler::create_employee,
        staff_handler::update_employee,
        staff_handler::delete_employee,
        staff_handler::list_schedules,
        staff_handler::get_schedule,
        staff_handler::create_schedule,
        staff_handler::update_schedule,
        staff_handler::delete_schedule,
        staff_handler::list_doctors,
        staff_handler::get_doctor,
        staff_handler::create_doctor,
        staff_handler::update_doctor,
        staff_handler::delete_doctor,
        // Catalog
        catalog_handler::overview,
        catalog_handler::list_offices,
        catalog_handler::get_office,
        catalog_handler::create_office,
        catalog_handler::update_office,
        catalog_handler::delete_office,
        catalog_handler::list_services,
        catalog_handler::get_service,
        catalog_handler::create_service,
        catalog_handler::update_service,
        catalog_handler::delete_service,
        // Patients
        patient_handler::list_patients,
        patient_handler::get_patient,
        patient_handler::create_patient,
        patient_handler::update_patient,
        patient_handler::delete_patient,
        patient_handler::my_record,
        patient_handler::patient_record,
        // Records
        record_handler::get_appointment,
        record_handler::create_appointment,
        record_handler::update_appointment,
        record_handler::delete_appointment,
        record_handler::get_medical_test,
        record_handler::create_medical_test,
        record_handler::update_medical_test,
        record_handler::delete_medical_test,
    ),
    components(
        schemas(
            // Accounts and auth
            Role,
            AccountResponse,
            NewAccount,
            AccountUpdate,
            auth_handler::LoginRequest,
            SignUp,
            TokenResponse,
            SignUpResponse,
            // Staff
            Gender,
            Weekday,
            NameInput,
            Position,
            Specialization,
            Employee,
            EmployeeInput,
            EmployeeDetails,
            Schedule,
            ScheduleInput,
            ScheduleDetails,
            Doctor,
            DoctorInput,
            DoctorDetails,
            // Catalog
            Office,
            OfficeInput,
            Service,
            ServiceInput,
            ServiceDetails,
            Overview,
            // Patients and records
            Patient,
            PatientInput,
            PatientRecord,
            MedicalTest,
            MedicalTestInput,
            MedicalTestDetails,
            Appointment,
            AppointmentInput,
            AppointmentDetails,
            // Pages
            PaginationMeta,
            AccountPage,
            PositionPage,
            SpecializationPage,
            EmployeePage,
            SchedulePage,
            DoctorPage,
            OfficePage,
            ServicePage,
            PatientPage,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and patient sign-up"),
        (name = "Accounts", description = "Account administration"),
        (name = "Staff", description = "Positions, specializations, employees, schedules and doctors"),
        (name = "Catalog", description = "Offices, services and the overview"),
        (name = "Patients", description = "Patient cards and records"),
        (name = "Records", description = "Appointments and medical tests")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_clinic_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/auth/signup"));
        assert!(paths.contains_key("/patients/{id}/record"));
        assert!(paths.contains_key("/medical-tests/{id}"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
