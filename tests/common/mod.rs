//! Shared fixtures: an in-memory SQLite database with the schema applied.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveTime, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database as SeaDatabase};
use uuid::Uuid;

use clinic::config::Config;
use clinic::domain::{
    AppointmentInput, DoctorDetails, DoctorInput, EmployeeDetails, EmployeeInput, Gender,
    MedicalTestInput, NameInput, NewAccount, Patient, PatientInput, Role, ScheduleInput, ServiceDetails,
    ServiceInput, Weekday,
};
use clinic::infra::Database;
use clinic::policy::Principal;
use clinic::services::{ServiceContainer, Services};

pub const JWT_SECRET: &str = "integration-secret-key-long-enough!!";

pub fn config() -> Config {
    Config::new("sqlite::memory:", JWT_SECRET).expect("valid config")
}

/// Single-connection pool: every connection to `:memory:` is its own database.
pub async fn database() -> Arc<Database> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let connection = SeaDatabase::connect(options)
        .await
        .expect("sqlite connection");
    let database = Database::from_connection(connection);
    database.run_migrations().await.expect("migrations");
    Arc::new(database)
}

pub async fn services() -> (Services, Arc<Database>) {
    let database = database().await;
    let services = Services::from_connection(database.get_connection(), config());
    (services, database)
}

pub fn admin() -> Principal {
    Principal::authenticated(Uuid::new_v4(), vec![Role::Administrator], None)
}

pub async fn create_account(services: &Services, username: &str, roles: Vec<Role>) -> Uuid {
    services
        .accounts()
        .create(
            &admin(),
            NewAccount {
                username: username.to_string(),
                password: "SecurePass123!".to_string(),
                email: None,
                first_name: String::new(),
                last_name: String::new(),
                roles,
            },
        )
        .await
        .expect("account created")
        .id
}

pub async fn create_patient(services: &Services, username: &str, full_name: &str) -> Patient {
    let account_id = create_account(services, username, vec![Role::Patient]).await;
    services
        .patients()
        .create(
            &admin(),
            PatientInput {
                account_id,
                full_name: full_name.to_string(),
                email: format!("{username}@example.com"),
                gender: Gender::Unspecified,
                phone_number: None,
                address: None,
                passport_id: None,
                birth_date: None,
            },
        )
        .await
        .expect("patient created")
}

pub async fn create_employee(
    services: &Services,
    username: &str,
    full_name: &str,
    position: &str,
) -> EmployeeDetails {
    let account_id = create_account(services, username, vec![Role::Doctor]).await;
    let position = services
        .staff()
        .create_position(
            &admin(),
            NameInput {
                name: position.to_string(),
            },
        )
        .await
        .expect("position created");

    services
        .staff()
        .create_employee(
            &admin(),
            EmployeeInput {
                account_id,
                full_name: full_name.to_string(),
                gender: Gender::Female,
                phone_number: None,
                record_book_id: None,
                passport_id: None,
                birth_date: None,
                position_id: position.id,
            },
        )
        .await
        .expect("employee created")
}

pub async fn create_doctor(services: &Services, employee_id: Uuid, specialization: &str) -> DoctorDetails {
    let specialization = services
        .staff()
        .create_specialization(
            &admin(),
            NameInput {
                name: specialization.to_string(),
            },
        )
        .await
        .expect("specialization created");

    services
        .staff()
        .create_doctor(
            &admin(),
            DoctorInput {
                employee_id,
                specialization_id: specialization.id,
            },
        )
        .await
        .expect("doctor created")
}

pub async fn create_service(services: &Services, name: &str, doctor_ids: Vec<Uuid>) -> ServiceDetails {
    services
        .catalog()
        .create_service(
            &admin(),
            ServiceInput {
                name: name.to_string(),
                description: None,
                cost: Some(1500),
                office_ids: Vec::new(),
                doctor_ids,
            },
        )
        .await
        .expect("service created")
}

pub fn appointment(patient_id: Uuid, service_id: Option<Uuid>, doctor_id: Option<Uuid>) -> AppointmentInput {
    AppointmentInput {
        date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap(),
        patient_complaints: Some("Головная боль".to_string()),
        anamnesis: None,
        examination_result: None,
        diagnosis: None,
        recommendations: None,
        patient_id,
        service_id,
        office_id: None,
        doctor_id,
    }
}

pub fn medical_test(patient_id: Uuid, service_id: Option<Uuid>) -> MedicalTestInput {
    MedicalTestInput {
        date: Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap(),
        name: "Общий анализ крови".to_string(),
        result: "В норме".to_string(),
        patient_id,
        service_id,
        office_id: None,
        doctor_id: None,
    }
}

pub fn monday_shift(employee_id: Uuid, start: u32, end: u32) -> ScheduleInput {
    ScheduleInput {
        employee_id,
        weekday: Weekday::Monday,
        work_start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
        work_end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
    }
}
