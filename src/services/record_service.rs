//! Record service - Medical tests and appointments.
//!
//! Patients may read their own records; lookups under a patient scope only
//! match that patient's rows.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    validate_input, AppointmentDetails, AppointmentInput, MedicalTestDetails, MedicalTestInput,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::policy::{Action, Principal, Resource};

/// Record service trait for dependency injection.
#[async_trait]
pub trait RecordService: Send + Sync {
    // Medical tests
    async fn get_medical_test(&self, principal: &Principal, id: Uuid)
        -> AppResult<MedicalTestDetails>;
    async fn create_medical_test(
        &self,
        principal: &Principal,
        input: MedicalTestInput,
    ) -> AppResult<MedicalTestDetails>;
    async fn update_medical_test(
        &self,
        principal: &Principal,
        id: Uuid,
        input: MedicalTestInput,
    ) -> AppResult<MedicalTestDetails>;
    async fn delete_medical_test(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    // Appointments
    async fn get_appointment(&self, principal: &Principal, id: Uuid)
        -> AppResult<AppointmentDetails>;
    async fn create_appointment(
        &self,
        principal: &Principal,
        input: AppointmentInput,
    ) -> AppResult<AppointmentDetails>;
    async fn update_appointment(
        &self,
        principal: &Principal,
        id: Uuid,
        input: AppointmentInput,
    ) -> AppResult<AppointmentDetails>;
    async fn delete_appointment(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

/// References carried by both kinds of record.
struct RecordLinks {
    patient_id: Uuid,
    service_id: Option<Uuid>,
    office_id: Option<Uuid>,
    doctor_id: Option<Uuid>,
}

impl From<&MedicalTestInput> for RecordLinks {
    fn from(input: &MedicalTestInput) -> Self {
        Self {
            patient_id: input.patient_id,
            service_id: input.service_id,
            office_id: input.office_id,
            doctor_id: input.doctor_id,
        }
    }
}

impl From<&AppointmentInput> for RecordLinks {
    fn from(input: &AppointmentInput) -> Self {
        Self {
            patient_id: input.patient_id,
            service_id: input.service_id,
            office_id: input.office_id,
            doctor_id: input.doctor_id,
        }
    }
}

/// Concrete implementation of RecordService using Unit of Work.
pub struct RecordManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RecordManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn check_links(&self, links: RecordLinks) -> AppResult<()> {
        self.uow
            .patients()
            .find_by_id(links.patient_id)
            .await?
            .ok_or_unknown("patient_id")?;
        if let Some(id) = links.service_id {
            self.uow
                .catalog()
                .find_service(id)
                .await?
                .ok_or_unknown("service_id")?;
        }
        if let Some(id) = links.office_id {
            self.uow
                .catalog()
                .find_office(id)
                .await?
                .ok_or_unknown("office_id")?;
        }
        if let Some(id) = links.doctor_id {
            self.uow
                .staff()
                .find_doctor(id)
                .await?
                .ok_or_unknown("doctor_id")?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> RecordService for RecordManager<U> {
    // =========================================================================
    // Medical tests
    // =========================================================================

    async fn get_medical_test(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> AppResult<MedicalTestDetails> {
        let scope = principal.authorize(Resource::MedicalTest, Action::View)?;
        self.uow
            .records()
            .find_medical_test(id, scope)
            .await?
            .ok_or_else(|| scope.miss())
    }

    async fn create_medical_test(
        &self,
        principal: &Principal,
        input: MedicalTestInput,
    ) -> AppResult<MedicalTestDetails> {
        principal.authorize(Resource::MedicalTest, Action::Create)?;
        validate_input(&input)?;
        self.check_links(RecordLinks::from(&input)).await?;

        let test = self.uow.records().create_medical_test(input).await?;
        tracing::info!(
            medical_test_id = %test.medical_test.id,
            patient_id = %test.medical_test.patient_id,
            "Medical test recorded"
        );
        Ok(test)
    }

    async fn update_medical_test(
        &self,
        principal: &Principal,
        id: Uuid,
        input: MedicalTestInput,
    ) -> AppResult<MedicalTestDetails> {
        principal.authorize(Resource::MedicalTest, Action::Update)?;
        validate_input(&input)?;
        self.check_links(RecordLinks::from(&input)).await?;
        self.uow.records().update_medical_test(id, input).await
    }

    async fn delete_medical_test(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::MedicalTest, Action::Delete)?;
        self.uow.records().delete_medical_test(id).await
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    async fn get_appointment(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> AppResult<AppointmentDetails> {
        let scope = principal.authorize(Resource::Appointment, Action::View)?;
        self.uow
            .records()
            .find_appointment(id, scope)
            .await?
            .ok_or_else(|| scope.miss())
    }

    async fn create_appointment(
        &self,
        principal: &Principal,
        input: AppointmentInput,
    ) -> AppResult<AppointmentDetails> {
        principal.authorize(Resource::Appointment, Action::Create)?;
        validate_input(&input)?;
        self.check_links(RecordLinks::from(&input)).await?;

        let appointment = self.uow.records().create_appointment(input).await?;
        tracing::info!(
            appointment_id = %appointment.appointment.id,
            patient_id = %appointment.appointment.patient_id,
            "Appointment recorded"
        );
        Ok(appointment)
    }

    async fn update_appointment(
        &self,
        principal: &Principal,
        id: Uuid,
        input: AppointmentInput,
    ) -> AppResult<AppointmentDetails> {
        principal.authorize(Resource::Appointment, Action::Update)?;
        validate_input(&input)?;
        self.check_links(RecordLinks::from(&input)).await?;
        self.uow.records().update_appointment(id, input).await
    }

    async fn delete_appointment(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Appointment, Action::Delete)?;
        self.uow.records().delete_appointment(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Appointment, Gender, Patient};
    use crate::errors::AppError;
    use crate::policy::Scope;
    use crate::services::testing::{doctor, patient, Repositories};
    use chrono::{TimeZone, Utc};

    fn appointment_of(patient_id: Uuid) -> AppointmentDetails {
        AppointmentDetails::new(
            Appointment {
                id: Uuid::new_v4(),
                date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap(),
                patient_complaints: Some("Кашель".to_string()),
                anamnesis: None,
                examination_result: None,
                diagnosis: None,
                recommendations: None,
                patient_id,
                service_id: None,
                office_id: None,
                doctor_id: None,
            },
            None,
        )
    }

    fn appointment_input(patient_id: Uuid) -> AppointmentInput {
        AppointmentInput {
            date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap(),
            patient_complaints: None,
            anamnesis: None,
            examination_result: None,
            diagnosis: None,
            recommendations: None,
            patient_id,
            service_id: None,
            office_id: Some(Uuid::new_v4()),
            doctor_id: None,
        }
    }

    #[tokio::test]
    async fn test_patient_viewing_foreign_appointment_is_forbidden() {
        let own = Uuid::new_v4();
        let mut repos = Repositories::default();
        // The scoped lookup matches nothing for someone else's appointment.
        repos
            .records
            .expect_find_appointment()
            .withf(move |_, scope| *scope == Scope::Patient(own))
            .returning(|_, _| Ok(None));
        let service = RecordManager::new(repos.into_uow());

        let result = service.get_appointment(&patient(own), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_patient_views_own_appointment() {
        let own = Uuid::new_v4();
        let mut repos = Repositories::default();
        repos
            .records
            .expect_find_appointment()
            .withf(move |_, scope| *scope == Scope::Patient(own))
            .returning(move |_, _| Ok(Some(appointment_of(own))));
        let service = RecordManager::new(repos.into_uow());

        let found = service
            .get_appointment(&patient(own), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(found.appointment.patient_id, own);
        assert_eq!(found.display, "Прием у — (2024-03-01 10:30)");
    }

    #[tokio::test]
    async fn test_missing_appointment_is_not_found_for_doctor() {
        let mut repos = Repositories::default();
        repos
            .records
            .expect_find_appointment()
            .withf(|_, scope| *scope == Scope::All)
            .returning(|_, _| Ok(None));
        let service = RecordManager::new(repos.into_uow());

        let result = service.get_appointment(&doctor(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_patient_cannot_create_appointments() {
        let own = Uuid::new_v4();
        let service = RecordManager::new(Repositories::default().into_uow());
        let result = service
            .create_appointment(&patient(own), appointment_input(own))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_doctor_cannot_delete_medical_tests() {
        let service = RecordManager::new(Repositories::default().into_uow());
        let result = service.delete_medical_test(&doctor(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_unknown_office_is_reported_against_field() {
        let mut repos = Repositories::default();
        repos.patients.expect_find_by_id().returning(|id| {
            Ok(Some(Patient {
                id,
                account_id: Uuid::new_v4(),
                full_name: String::new(),
                email: String::new(),
                gender: Gender::Unspecified,
                phone_number: None,
                address: None,
                passport_id: None,
                birth_date: None,
            }))
        });
        repos.catalog.expect_find_office().returning(|_| Ok(None));
        repos.records.expect_create_appointment().never();
        let service = RecordManager::new(repos.into_uow());

        let result = service
            .create_appointment(&doctor(), appointment_input(Uuid::new_v4()))
            .await;
        assert_eq!(result.unwrap_err().to_string(), "office_id: does not exist");
    }
}
