//! Patient service - Patient cards and the medical record view.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::domain::{validate_input, Patient, PatientInput, PatientRecord};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::policy::{Action, Principal, Resource, Scope};
use crate::types::{Paginated, PaginationParams};

/// Patient service trait for dependency injection.
#[async_trait]
pub trait PatientService: Send + Sync {
    async fn list(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<Patient>>;

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Patient>;

    async fn create(&self, principal: &Principal, input: PatientInput) -> AppResult<Patient>;

    async fn update(&self, principal: &Principal, id: Uuid, input: PatientInput)
        -> AppResult<Patient>;

    /// Deletes the patient's medical tests and appointments with the card
    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    /// The caller's own card with its appointments and medical tests
    async fn me(&self, principal: &Principal) -> AppResult<PatientRecord>;

    /// A card with its appointments and medical tests, newest first
    async fn record(&self, principal: &Principal, id: Uuid) -> AppResult<PatientRecord>;
}

/// Concrete implementation of PatientService using Unit of Work.
pub struct PatientManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PatientManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_scoped(&self, id: Uuid, scope: Scope) -> AppResult<Patient> {
        if scope.patient_id().is_some_and(|own| own != id) {
            return Err(scope.miss());
        }
        self.uow
            .patients()
            .find_by_id(id)
            .await?
            .ok_or_else(|| scope.miss())
    }

    async fn load_record(&self, patient: Patient) -> AppResult<PatientRecord> {
        let records = self.uow.records();
        let (appointments, medical_tests) = parallel::join2(
            records.appointments_for_patient(patient.id),
            records.medical_tests_for_patient(patient.id),
        )
        .await?;

        Ok(PatientRecord {
            patient,
            appointments,
            medical_tests,
        })
    }

    /// The account must exist and carry no other patient card.
    async fn check_account(&self, input: &PatientInput, current: Option<Uuid>) -> AppResult<()> {
        validate_input(input)?;
        self.uow
            .accounts()
            .find_by_id(input.account_id)
            .await?
            .ok_or_unknown("account_id")?;

        match self.uow.patients().find_by_account(input.account_id).await? {
            Some(linked) if Some(linked.id) != current => Err(AppError::invalid_field(
                "account_id",
                "is already linked to another patient",
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> PatientService for PatientManager<U> {
    async fn list(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<Patient>> {
        principal.authorize(Resource::Patient, Action::List)?;
        let (data, total) = self.uow.patients().list(&params).await?;
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Patient> {
        let scope = principal.authorize(Resource::Patient, Action::View)?;
        self.find_scoped(id, scope).await
    }

    async fn create(&self, principal: &Principal, input: PatientInput) -> AppResult<Patient> {
        principal.authorize(Resource::Patient, Action::Create)?;
        self.check_account(&input, None).await?;
        let patient = self.uow.patients().create(input).await?;
        tracing::info!(patient_id = %patient.id, "Patient created");
        Ok(patient)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: PatientInput,
    ) -> AppResult<Patient> {
        principal.authorize(Resource::Patient, Action::Update)?;
        self.check_account(&input, Some(id)).await?;
        self.uow.patients().update(id, input).await
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Patient, Action::Delete)?;
        self.uow.patients().delete(id).await?;
        tracing::info!(patient_id = %id, "Patient deleted with records");
        Ok(())
    }

    async fn me(&self, principal: &Principal) -> AppResult<PatientRecord> {
        let scope = principal.authorize(Resource::Patient, Action::View)?;
        let id = principal.patient_id().ok_or(AppError::NotFound)?;
        let patient = self.find_scoped(id, scope).await?;
        self.load_record(patient).await
    }

    async fn record(&self, principal: &Principal, id: Uuid) -> AppResult<PatientRecord> {
        let scope = principal.authorize(Resource::Patient, Action::View)?;
        let patient = self.find_scoped(id, scope).await?;
        self.load_record(patient).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, Role};
    use crate::services::testing::{account, administrator, doctor, patient, Repositories};

    fn card(id: Uuid) -> Patient {
        Patient {
            id,
            account_id: Uuid::new_v4(),
            full_name: "Ivanov Ivan Ivanovich".to_string(),
            email: String::new(),
            gender: Gender::Male,
            phone_number: None,
            address: None,
            passport_id: None,
            birth_date: None,
        }
    }

    fn input(account_id: Uuid) -> PatientInput {
        PatientInput {
            account_id,
            full_name: "Ivanov Ivan Ivanovich".to_string(),
            email: String::new(),
            gender: Gender::Male,
            phone_number: None,
            address: None,
            passport_id: None,
            birth_date: None,
        }
    }

    #[tokio::test]
    async fn test_anonymous_listing_is_forbidden_without_storage_access() {
        // No expectations: any repository call would panic.
        let service = PatientManager::new(Repositories::default().into_uow());
        let result = service
            .list(&Principal::anonymous(), PaginationParams::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_patient_cannot_list_patients() {
        let service = PatientManager::new(Repositories::default().into_uow());
        let result = service
            .list(&patient(Uuid::new_v4()), PaginationParams::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_doctor_lists_patients() {
        let mut repos = Repositories::default();
        repos
            .patients
            .expect_list()
            .returning(|_| Ok((vec![card(Uuid::new_v4())], 11)));
        let service = PatientManager::new(repos.into_uow());

        let page = service
            .list(&doctor(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.total_pages, 2);
    }

    #[tokio::test]
    async fn test_patient_cannot_view_other_card() {
        let service = PatientManager::new(Repositories::default().into_uow());
        let result = service
            .get(&patient(Uuid::new_v4()), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_patient_views_own_record() {
        let own = Uuid::new_v4();
        let mut repos = Repositories::default();
        repos
            .patients
            .expect_find_by_id()
            .returning(|id| Ok(Some(card(id))));
        repos
            .records
            .expect_appointments_for_patient()
            .withf(move |id| *id == own)
            .returning(|_| Ok(vec![]));
        repos
            .records
            .expect_medical_tests_for_patient()
            .withf(move |id| *id == own)
            .returning(|_| Ok(vec![]));
        let service = PatientManager::new(repos.into_uow());

        let record = service.me(&patient(own)).await.unwrap();
        assert_eq!(record.patient.id, own);
        assert!(record.appointments.is_empty());
    }

    #[tokio::test]
    async fn test_patient_role_without_card_is_denied() {
        let principal =
            Principal::authenticated(Uuid::new_v4(), vec![Role::Patient], None);
        let service = PatientManager::new(Repositories::default().into_uow());
        let result = service.me(&principal).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_missing_card_is_not_found_for_staff() {
        let mut repos = Repositories::default();
        repos.patients.expect_find_by_id().returning(|_| Ok(None));
        let service = PatientManager::new(repos.into_uow());

        let result = service.record(&doctor(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_rejects_account_with_card() {
        let mut repos = Repositories::default();
        repos
            .accounts
            .expect_find_by_id()
            .returning(|_| Ok(Some(account("ivanov", "SecurePass123!", vec![Role::Patient]))));
        repos
            .patients
            .expect_find_by_account()
            .returning(|_| Ok(Some(card(Uuid::new_v4()))));
        repos.patients.expect_create().never();
        let service = PatientManager::new(repos.into_uow());

        let result = service
            .create(&administrator(), input(Uuid::new_v4()))
            .await;
        assert!(result.unwrap_err().to_string().starts_with("account_id:"));
    }

    #[tokio::test]
    async fn test_doctor_cannot_delete_patients() {
        let service = PatientManager::new(Repositories::default().into_uow());
        let result = service.delete(&doctor(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
