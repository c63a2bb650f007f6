//! Medical record repository: medical tests and appointments.
//!
//! Lookups take a [`Scope`]; a patient-scoped lookup only matches records
//! of that patient.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::base;
use super::entities::{appointment, medical_test};
use super::staff_repository::find_doctors;
use crate::domain::{
    Appointment, AppointmentDetails, AppointmentInput, DoctorDetails, MedicalTest,
    MedicalTestDetails, MedicalTestInput,
};
use crate::errors::{AppError, AppResult};
use crate::policy::Scope;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Medical record repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    // Medical tests
    async fn find_medical_test(&self, id: Uuid, scope: Scope)
        -> AppResult<Option<MedicalTestDetails>>;
    async fn create_medical_test(&self, input: MedicalTestInput) -> AppResult<MedicalTestDetails>;
    async fn update_medical_test(
        &self,
        id: Uuid,
        input: MedicalTestInput,
    ) -> AppResult<MedicalTestDetails>;
    async fn delete_medical_test(&self, id: Uuid) -> AppResult<()>;
    /// Newest first
    async fn medical_tests_for_patient(&self, patient_id: Uuid)
        -> AppResult<Vec<MedicalTestDetails>>;

    // Appointments
    async fn find_appointment(&self, id: Uuid, scope: Scope)
        -> AppResult<Option<AppointmentDetails>>;
    async fn create_appointment(&self, input: AppointmentInput) -> AppResult<AppointmentDetails>;
    async fn update_appointment(
        &self,
        id: Uuid,
        input: AppointmentInput,
    ) -> AppResult<AppointmentDetails>;
    async fn delete_appointment(&self, id: Uuid) -> AppResult<()>;
    /// Newest first
    async fn appointments_for_patient(&self, patient_id: Uuid)
        -> AppResult<Vec<AppointmentDetails>>;
}

/// Concrete implementation of RecordRepository
pub struct RecordStore {
    db: DatabaseConnection,
}

impl RecordStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordRepository for RecordStore {
    // =========================================================================
    // Medical tests
    // =========================================================================

    async fn find_medical_test(
        &self,
        id: Uuid,
        scope: Scope,
    ) -> AppResult<Option<MedicalTestDetails>> {
        let mut select = medical_test::Entity::find_by_id(id);
        if let Some(patient_id) = scope.patient_id() {
            select = select.filter(medical_test::Column::PatientId.eq(patient_id));
        }
        let model = select.one(&self.db).await?;
        Ok(model.map(|m| MedicalTestDetails::from(MedicalTest::from(m))))
    }

    async fn create_medical_test(&self, input: MedicalTestInput) -> AppResult<MedicalTestDetails> {
        let mut active = medical_test_fields(input);
        active.id = Set(Uuid::new_v4());
        let model = active.insert(&self.db).await?;
        Ok(MedicalTestDetails::from(MedicalTest::from(model)))
    }

    async fn update_medical_test(
        &self,
        id: Uuid,
        input: MedicalTestInput,
    ) -> AppResult<MedicalTestDetails> {
        let model = medical_test::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active = medical_test_fields(input);
        active.id = ActiveValue::Unchanged(model.id);
        let model = active.update(&self.db).await?;
        Ok(MedicalTestDetails::from(MedicalTest::from(model)))
    }

    async fn delete_medical_test(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<medical_test::Entity, _>(id, &self.db).await
    }

    async fn medical_tests_for_patient(
        &self,
        patient_id: Uuid,
    ) -> AppResult<Vec<MedicalTestDetails>> {
        let models = medical_test::Entity::find()
            .filter(medical_test::Column::PatientId.eq(patient_id))
            .order_by_desc(medical_test::Column::Date)
            .order_by_asc(medical_test::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .map(|m| MedicalTestDetails::from(MedicalTest::from(m)))
            .collect())
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    async fn find_appointment(
        &self,
        id: Uuid,
        scope: Scope,
    ) -> AppResult<Option<AppointmentDetails>> {
        let mut select = appointment::Entity::find_by_id(id);
        if let Some(patient_id) = scope.patient_id() {
            select = select.filter(appointment::Column::PatientId.eq(patient_id));
        }
        let models: Vec<_> = select.one(&self.db).await?.into_iter().collect();
        Ok(appointment_details(&self.db, models).await?.pop())
    }

    async fn create_appointment(&self, input: AppointmentInput) -> AppResult<AppointmentDetails> {
        let mut active = appointment_fields(input);
        active.id = Set(Uuid::new_v4());
        let model = active.insert(&self.db).await?;
        base::single(appointment_details(&self.db, vec![model]).await?)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        input: AppointmentInput,
    ) -> AppResult<AppointmentDetails> {
        let model = appointment::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active = appointment_fields(input);
        active.id = ActiveValue::Unchanged(model.id);
        let model = active.update(&self.db).await?;
        base::single(appointment_details(&self.db, vec![model]).await?)
    }

    async fn delete_appointment(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<appointment::Entity, _>(id, &self.db).await
    }

    async fn appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> AppResult<Vec<AppointmentDetails>> {
        let models = appointment::Entity::find()
            .filter(appointment::Column::PatientId.eq(patient_id))
            .order_by_desc(appointment::Column::Date)
            .order_by_asc(appointment::Column::DoctorId)
            .all(&self.db)
            .await?;
        appointment_details(&self.db, models).await
    }
}

async fn appointment_details<C: ConnectionTrait>(
    db: &C,
    models: Vec<appointment::Model>,
) -> AppResult<Vec<AppointmentDetails>> {
    let doctor_ids: Vec<Uuid> = models.iter().filter_map(|m| m.doctor_id).collect();
    let doctors: HashMap<Uuid, DoctorDetails> = find_doctors(db, doctor_ids)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

    Ok(models
        .into_iter()
        .map(|model| {
            let doctor = model.doctor_id.and_then(|id| doctors.get(&id).cloned());
            AppointmentDetails::new(Appointment::from(model), doctor)
        })
        .collect())
}

fn medical_test_fields(input: MedicalTestInput) -> medical_test::ActiveModel {
    medical_test::ActiveModel {
        id: ActiveValue::NotSet,
        date: Set(input.date),
        name: Set(input.name),
        result: Set(input.result),
        patient_id: Set(input.patient_id),
        service_id: Set(input.service_id),
        office_id: Set(input.office_id),
        doctor_id: Set(input.doctor_id),
    }
}

fn appointment_fields(input: AppointmentInput) -> appointment::ActiveModel {
    appointment::ActiveModel {
        id: ActiveValue::NotSet,
        date: Set(input.date),
        patient_complaints: Set(input.patient_complaints),
        anamnesis: Set(input.anamnesis),
        examination_result: Set(input.examination_result),
        diagnosis: Set(input.diagnosis),
        recommendations: Set(input.recommendations),
        patient_id: Set(input.patient_id),
        service_id: Set(input.service_id),
        office_id: Set(input.office_id),
        doctor_id: Set(input.doctor_id),
    }
}
