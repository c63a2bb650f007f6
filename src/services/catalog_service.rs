//! Catalog service - Offices, services and the public overview.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::config::{OVERVIEW_DOCTOR_COUNT, OVERVIEW_SERVICE_COUNT};
use crate::domain::{
    ensure_not_blank, validate_input, Office, OfficeInput, Overview, ServiceDetails, ServiceInput,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::policy::{Action, Principal, Resource};
use crate::types::{Paginated, PaginationParams};

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    // Offices
    async fn list_offices(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<Office>>;
    async fn get_office(&self, principal: &Principal, id: Uuid) -> AppResult<Office>;
    async fn create_office(&self, principal: &Principal, input: OfficeInput) -> AppResult<Office>;
    async fn update_office(
        &self,
        principal: &Principal,
        id: Uuid,
        input: OfficeInput,
    ) -> AppResult<Office>;
    async fn delete_office(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    // Services
    async fn list_services(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<ServiceDetails>>;
    async fn get_service(&self, principal: &Principal, id: Uuid) -> AppResult<ServiceDetails>;
    async fn create_service(
        &self,
        principal: &Principal,
        input: ServiceInput,
    ) -> AppResult<ServiceDetails>;
    /// Full update; the office and doctor lists replace the current links
    async fn update_service(
        &self,
        principal: &Principal,
        id: Uuid,
        input: ServiceInput,
    ) -> AppResult<ServiceDetails>;
    /// Records that mention the service keep their row with the reference cleared
    async fn delete_service(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    /// Counts plus the first doctors and services, for the landing page
    async fn overview(&self, principal: &Principal) -> AppResult<Overview>;
}

fn distinct(ids: &[Uuid]) -> Vec<Uuid> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Validate a service payload and resolve every office and doctor it links.
    async fn check_service(&self, input: &ServiceInput) -> AppResult<()> {
        validate_input(input)?;
        ensure_not_blank("name", &input.name)?;

        let office_ids = distinct(&input.office_ids);
        let doctor_ids = distinct(&input.doctor_ids);
        let (offices, doctors) = parallel::join2(
            self.uow.catalog().find_offices(office_ids.clone()),
            self.uow.staff().find_doctors(doctor_ids.clone()),
        )
        .await?;

        if offices.len() != office_ids.len() {
            return Err(AppError::invalid_field("office_ids", "contains an unknown office"));
        }
        if doctors.len() != doctor_ids.len() {
            return Err(AppError::invalid_field("doctor_ids", "contains an unknown doctor"));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    // =========================================================================
    // Offices
    // =========================================================================

    async fn list_offices(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<Office>> {
        principal.authorize(Resource::Office, Action::List)?;
        let (data, total) = self.uow.catalog().list_offices(&params).await?;
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get_office(&self, principal: &Principal, id: Uuid) -> AppResult<Office> {
        principal.authorize(Resource::Office, Action::View)?;
        self.uow.catalog().find_office(id).await?.ok_or_not_found()
    }

    async fn create_office(&self, principal: &Principal, input: OfficeInput) -> AppResult<Office> {
        principal.authorize(Resource::Office, Action::Create)?;
        validate_input(&input)?;
        let office = self.uow.catalog().create_office(input.office_number).await?;
        tracing::info!(office_id = %office.id, "Office created");
        Ok(office)
    }

    async fn update_office(
        &self,
        principal: &Principal,
        id: Uuid,
        input: OfficeInput,
    ) -> AppResult<Office> {
        principal.authorize(Resource::Office, Action::Update)?;
        validate_input(&input)?;
        self.uow
            .catalog()
            .update_office(id, input.office_number)
            .await
    }

    async fn delete_office(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Office, Action::Delete)?;
        self.uow.catalog().delete_office(id).await?;
        tracing::info!(office_id = %id, "Office deleted");
        Ok(())
    }

    // =========================================================================
    // Services
    // =========================================================================

    async fn list_services(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<ServiceDetails>> {
        principal.authorize(Resource::Service, Action::List)?;
        let (data, total) = self.uow.catalog().list_services(&params).await?;
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get_service(&self, principal: &Principal, id: Uuid) -> AppResult<ServiceDetails> {
        principal.authorize(Resource::Service, Action::View)?;
        self.uow.catalog().find_service(id).await?.ok_or_not_found()
    }

    async fn create_service(
        &self,
        principal: &Principal,
        input: ServiceInput,
    ) -> AppResult<ServiceDetails> {
        principal.authorize(Resource::Service, Action::Create)?;
        self.check_service(&input).await?;

        let service = self
            .uow
            .transaction(move |ctx| Box::pin(async move { ctx.catalog().create_service(input).await }))
            .await?;
        tracing::info!(service_id = %service.service.id, "Service created");
        Ok(service)
    }

    async fn update_service(
        &self,
        principal: &Principal,
        id: Uuid,
        input: ServiceInput,
    ) -> AppResult<ServiceDetails> {
        principal.authorize(Resource::Service, Action::Update)?;
        self.check_service(&input).await?;

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move { ctx.catalog().update_service(id, input).await })
            })
            .await
    }

    async fn delete_service(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Service, Action::Delete)?;
        self.uow.catalog().delete_service(id).await?;
        tracing::info!(service_id = %id, "Service deleted");
        Ok(())
    }

    async fn overview(&self, principal: &Principal) -> AppResult<Overview> {
        principal.authorize(Resource::Service, Action::List)?;
        principal.authorize(Resource::Doctor, Action::List)?;

        let doctor_page = PaginationParams {
            page: 1,
            per_page: OVERVIEW_DOCTOR_COUNT,
        };
        let service_page = PaginationParams {
            page: 1,
            per_page: OVERVIEW_SERVICE_COUNT,
        };

        let (catalog, staff, patients) =
            (self.uow.catalog(), self.uow.staff(), self.uow.patients());
        let ((num_services, num_doctors, num_patients), ((doctors, _), (services, _))) =
            parallel::join2(
                parallel::join3(
                    catalog.count_services(),
                    staff.count_doctors(),
                    patients.count(),
                ),
                parallel::join2(
                    staff.list_doctors(&doctor_page),
                    catalog.list_services(&service_page),
                ),
            )
            .await?;

        Ok(Overview {
            num_services,
            num_doctors,
            num_patients,
            doctors,
            services: services.into_iter().map(|details| details.service).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Service;
    use crate::services::testing::{administrator, doctor, patient, Repositories};

    fn service_input(office_ids: Vec<Uuid>) -> ServiceInput {
        ServiceInput {
            name: "ЭКГ".to_string(),
            description: None,
            cost: Some(1500),
            office_ids,
            doctor_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_unknown_office_link_is_rejected() {
        let known = Office {
            id: Uuid::new_v4(),
            office_number: "101".to_string(),
        };
        let mut repos = Repositories::default();
        let found = known.clone();
        repos
            .catalog
            .expect_find_offices()
            .returning(move |_| Ok(vec![found.clone()]));
        repos.staff.expect_find_doctors().returning(|_| Ok(vec![]));
        let service = CatalogManager::new(repos.into_uow());

        let result = service
            .create_service(&administrator(), service_input(vec![known.id, Uuid::new_v4()]))
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "office_ids: contains an unknown office"
        );
    }

    #[tokio::test]
    async fn test_repeated_office_ids_count_once() {
        let known = Office {
            id: Uuid::new_v4(),
            office_number: "101".to_string(),
        };
        let mut repos = Repositories::default();
        let found = known.clone();
        repos
            .catalog
            .expect_find_offices()
            .withf(|ids| ids.len() == 1)
            .returning(move |_| Ok(vec![found.clone()]));
        repos.staff.expect_find_doctors().returning(|_| Ok(vec![]));
        let service = CatalogManager::new(repos.into_uow());

        // Passes the reference checks and reaches the transaction, which
        // the mocked unit of work does not provide.
        let result = service
            .create_service(&administrator(), service_input(vec![known.id, known.id]))
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_doctor_cannot_create_services() {
        let service = CatalogManager::new(Repositories::default().into_uow());
        let result = service
            .create_service(&doctor(), service_input(vec![]))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_patient_cannot_manage_offices() {
        let service = CatalogManager::new(Repositories::default().into_uow());
        let result = service
            .list_offices(&patient(Uuid::new_v4()), PaginationParams::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_overview_is_public_and_keeps_plain_services() {
        let mut repos = Repositories::default();
        repos.catalog.expect_count_services().returning(|| Ok(4));
        repos.staff.expect_count_doctors().returning(|| Ok(2));
        repos.patients.expect_count().returning(|| Ok(9));
        repos
            .staff
            .expect_list_doctors()
            .withf(|params| params.per_page == 5 && params.page == 1)
            .returning(|_| Ok((vec![], 2)));
        repos
            .catalog
            .expect_list_services()
            .withf(|params| params.per_page == 3)
            .returning(|_| {
                Ok((
                    vec![ServiceDetails {
                        service: Service {
                            id: Uuid::new_v4(),
                            name: "ЭКГ".to_string(),
                            description: None,
                            cost: None,
                        },
                        offices: vec![],
                        doctors: vec![],
                    }],
                    4,
                ))
            });
        let service = CatalogManager::new(repos.into_uow());

        let overview = service.overview(&Principal::anonymous()).await.unwrap();
        assert_eq!(overview.num_services, 4);
        assert_eq!(overview.num_doctors, 2);
        assert_eq!(overview.num_patients, 9);
        assert_eq!(overview.services.len(), 1);
        assert_eq!(overview.services[0].name, "ЭКГ");
    }
}
