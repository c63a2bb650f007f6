//! Service-level tests against an in-memory SQLite database.
//!
//! Covers the delete rules (cascade, set null, restrict), display strings and
//! patient sign-up end to end.

mod common;

use clinic::config::GROUP_PATIENT;
use clinic::domain::{Gender, NameInput, Role, SignUp};
use clinic::errors::AppError;
use clinic::policy::Principal;
use clinic::services::ServiceContainer;
use clinic::types::PaginationParams;

use common::{
    admin, appointment, create_doctor, create_employee, create_patient, create_service,
    medical_test, monday_shift, services,
};

fn sign_up_form(username: &str) -> SignUp {
    SignUp {
        username: username.to_string(),
        password1: "SecurePass123!".to_string(),
        password2: "SecurePass123!".to_string(),
        first_name: "Ivan".to_string(),
        last_name: "Ivanov".to_string(),
        patronymic: "Ivanovich".to_string(),
        gender: Gender::Male,
        birth_date: None,
        passport_id: None,
        phone_number: Some("89991234567".to_string()),
        email: "i@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_deleting_patient_removes_their_records() {
    let (services, _db) = services().await;
    let patient = create_patient(&services, "petrov", "Петров Петр Петрович").await;

    let created = services
        .records()
        .create_appointment(&admin(), appointment(patient.id, None, None))
        .await
        .unwrap();

    services.patients().delete(&admin(), patient.id).await.unwrap();

    let result = services
        .records()
        .get_appointment(&admin(), created.appointment.id)
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_deleting_service_clears_record_reference() {
    let (services, _db) = services().await;
    let patient = create_patient(&services, "petrov", "Петров Петр Петрович").await;
    let service = create_service(&services, "Консультация", Vec::new()).await;

    let created = services
        .records()
        .create_appointment(&admin(), appointment(patient.id, Some(service.service.id), None))
        .await
        .unwrap();
    assert_eq!(created.appointment.service_id, Some(service.service.id));

    services
        .catalog()
        .delete_service(&admin(), service.service.id)
        .await
        .unwrap();

    let reread = services
        .records()
        .get_appointment(&admin(), created.appointment.id)
        .await
        .unwrap();
    assert_eq!(reread.appointment.service_id, None);
    assert_eq!(reread.appointment.patient_id, patient.id);
}

#[tokio::test]
async fn test_deleting_patient_removes_their_medical_tests() {
    let (services, _db) = services().await;
    let patient = create_patient(&services, "petrov", "Петров Петр Петрович").await;

    let created = services
        .records()
        .create_medical_test(&admin(), medical_test(patient.id, None))
        .await
        .unwrap();
    assert_eq!(created.display, "Общий анализ крови (2024-03-02 08:00)");

    services.patients().delete(&admin(), patient.id).await.unwrap();

    let result = services
        .records()
        .get_medical_test(&admin(), created.medical_test.id)
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_deleting_service_clears_medical_test_reference() {
    let (services, _db) = services().await;
    let patient = create_patient(&services, "petrov", "Петров Петр Петрович").await;
    let service = create_service(&services, "Анализы", Vec::new()).await;

    let created = services
        .records()
        .create_medical_test(&admin(), medical_test(patient.id, Some(service.service.id)))
        .await
        .unwrap();
    assert_eq!(created.medical_test.service_id, Some(service.service.id));

    services
        .catalog()
        .delete_service(&admin(), service.service.id)
        .await
        .unwrap();

    let reread = services
        .records()
        .get_medical_test(&admin(), created.medical_test.id)
        .await
        .unwrap();
    assert_eq!(reread.medical_test.service_id, None);
    assert_eq!(reread.medical_test.patient_id, patient.id);
    assert_eq!(reread.medical_test.result, "В норме");
}

#[tokio::test]
async fn test_position_in_use_cannot_be_deleted() {
    let (services, _db) = services().await;
    let employee = create_employee(&services, "anna", "Петрова Анна", "Терапевт").await;

    let result = services
        .staff()
        .delete_position(&admin(), employee.position.id)
        .await;
    assert!(matches!(result, Err(AppError::ReferentialIntegrity(_))));

    // Still there
    let position = services
        .staff()
        .get_position(&admin(), employee.position.id)
        .await
        .unwrap();
    assert_eq!(position.name, "Терапевт");
}

#[tokio::test]
async fn test_unused_position_is_deleted() {
    let (services, _db) = services().await;
    let position = services
        .staff()
        .create_position(
            &admin(),
            NameInput {
                name: "Регистратор".to_string(),
            },
        )
        .await
        .unwrap();

    services
        .staff()
        .delete_position(&admin(), position.id)
        .await
        .unwrap();

    let result = services.staff().get_position(&admin(), position.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_deleting_employee_removes_doctor_and_schedules() {
    let (services, _db) = services().await;
    let employee = create_employee(&services, "anna", "Петрова Анна", "Врач").await;
    let doctor = create_doctor(&services, employee.employee.id, "Кардиология").await;
    let schedule = services
        .staff()
        .create_schedule(&admin(), monday_shift(employee.employee.id, 9, 17))
        .await
        .unwrap();

    services
        .staff()
        .delete_employee(&admin(), employee.employee.id)
        .await
        .unwrap();

    assert!(matches!(
        services.staff().get_doctor(&admin(), doctor.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        services
            .staff()
            .get_schedule(&admin(), schedule.schedule.id)
            .await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_display_strings_compose_related_records() {
    let (services, _db) = services().await;
    let employee = create_employee(&services, "anna", "Петрова Анна", "Врач").await;
    let doctor = create_doctor(&services, employee.employee.id, "Кардиология").await;
    let schedule = services
        .staff()
        .create_schedule(&admin(), monday_shift(employee.employee.id, 9, 17))
        .await
        .unwrap();

    assert_eq!(employee.display, "Врач Петрова Анна");
    assert_eq!(doctor.display, "Врач Петрова Анна : Кардиология");
    assert_eq!(schedule.display, "Врач Петрова Анна, пн: 09:00:00-17:00:00");
}

#[tokio::test]
async fn test_doctor_reread_links_employee_and_specialization() {
    let (services, _db) = services().await;
    let employee = create_employee(&services, "anna", "Петрова Анна", "Врач").await;
    let doctor = create_doctor(&services, employee.employee.id, "Кардиология").await;

    let reread = services.staff().get_doctor(&admin(), doctor.id).await.unwrap();
    assert_eq!(reread.employee.employee.id, employee.employee.id);
    assert_eq!(reread.specialization.id, doctor.specialization.id);
    assert_eq!(reread.specialization.name, "Кардиология");
    assert_eq!(reread.display, "Врач Петрова Анна : Кардиология");
}

#[tokio::test]
async fn test_appointment_survives_doctor_removal() {
    let (services, _db) = services().await;
    let patient = create_patient(&services, "petrov", "Петров Петр Петрович").await;
    let employee = create_employee(&services, "anna", "Петрова Анна", "Врач").await;
    let doctor = create_doctor(&services, employee.employee.id, "Кардиология").await;

    let created = services
        .records()
        .create_appointment(&admin(), appointment(patient.id, None, Some(doctor.id)))
        .await
        .unwrap();
    assert_eq!(
        created.display,
        "Прием у Врач Петрова Анна : Кардиология (2024-03-01 10:30)"
    );

    services.staff().delete_doctor(&admin(), doctor.id).await.unwrap();

    let reread = services
        .records()
        .get_appointment(&admin(), created.appointment.id)
        .await
        .unwrap();
    assert_eq!(reread.appointment.doctor_id, None);
    assert_eq!(reread.display, "Прием у — (2024-03-01 10:30)");
}

#[tokio::test]
async fn test_service_links_are_replaced_on_update() {
    let (services, _db) = services().await;
    let employee = create_employee(&services, "anna", "Петрова Анна", "Врач").await;
    let doctor = create_doctor(&services, employee.employee.id, "Кардиология").await;
    let service = create_service(&services, "ЭКГ", vec![doctor.id]).await;
    assert_eq!(service.doctors.len(), 1);

    let updated = services
        .catalog()
        .update_service(
            &admin(),
            service.service.id,
            clinic::domain::ServiceInput {
                name: "ЭКГ с расшифровкой".to_string(),
                description: None,
                cost: None,
                office_ids: Vec::new(),
                doctor_ids: Vec::new(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.service.name, "ЭКГ с расшифровкой");
    assert!(updated.doctors.is_empty());
}

#[tokio::test]
async fn test_sign_up_creates_patient_and_signs_in() {
    let (services, _db) = services().await;

    let response = services
        .auth()
        .sign_up(&Principal::anonymous(), sign_up_form("ivanov"))
        .await
        .unwrap();

    assert_eq!(response.patient.full_name, "Ivanov Ivan Ivanovich");
    assert_eq!(response.patient.email, "i@example.com");

    let claims = services
        .auth()
        .verify_token(&response.token.access_token)
        .unwrap();
    assert_eq!(claims.username, "ivanov");
    assert_eq!(claims.groups, vec![GROUP_PATIENT.to_string()]);

    let principal = services
        .auth()
        .resolve_principal(Some(&response.token.access_token))
        .await
        .unwrap();
    assert_eq!(principal.roles(), &[Role::Patient]);
    assert_eq!(principal.patient_id(), Some(response.patient.id));

    // The new patient sees only their own card
    let record = services.patients().me(&principal).await.unwrap();
    assert_eq!(record.patient.id, response.patient.id);
    assert!(record.appointments.is_empty());
}

#[tokio::test]
async fn test_sign_up_rejects_taken_username() {
    let (services, _db) = services().await;
    services
        .auth()
        .sign_up(&Principal::anonymous(), sign_up_form("ivanov"))
        .await
        .unwrap();

    let result = services
        .auth()
        .sign_up(&Principal::anonymous(), sign_up_form("ivanov"))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let patients = services
        .patients()
        .list(&admin(), PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(patients.meta.total, 1);
}

#[tokio::test]
async fn test_login_after_sign_up() {
    let (services, _db) = services().await;
    services
        .auth()
        .sign_up(&Principal::anonymous(), sign_up_form("ivanov"))
        .await
        .unwrap();

    let token = services
        .auth()
        .login("ivanov".to_string(), "SecurePass123!".to_string())
        .await
        .unwrap();
    assert_eq!(token.token_type, "Bearer");

    let wrong = services
        .auth()
        .login("ivanov".to_string(), "WrongPass123!".to_string())
        .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_patient_cannot_read_foreign_appointment() {
    let (services, _db) = services().await;
    let own = create_patient(&services, "petrov", "Петров Петр Петрович").await;
    let other = create_patient(&services, "sidorov", "Сидоров Сидор").await;

    let foreign = services
        .records()
        .create_appointment(&admin(), appointment(other.id, None, None))
        .await
        .unwrap();

    let caller = Principal::authenticated(own.account_id, vec![Role::Patient], Some(own.id));
    let result = services
        .records()
        .get_appointment(&caller, foreign.appointment.id)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_rereading_unchanged_record_is_stable() {
    let (services, _db) = services().await;
    let patient = create_patient(&services, "petrov", "Петров Петр Петрович").await;

    let first = services.patients().get(&admin(), patient.id).await.unwrap();
    let second = services.patients().get(&admin(), patient.id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, patient);
}
