//! Catalog repository: offices and the services offered in them.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::base;
use super::entities::{office, service, service_doctor, service_office};
use super::staff_repository::find_doctors;
use crate::domain::{DoctorDetails, Office, Service, ServiceDetails, ServiceInput};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Catalog repository trait for dependency injection.
///
/// Service writes touch the join tables as well and go through the unit of
/// work; see `TransactionContext::catalog`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Offices
    async fn list_offices(&self, params: &PaginationParams) -> AppResult<(Vec<Office>, u64)>;
    async fn find_office(&self, id: Uuid) -> AppResult<Option<Office>>;
    /// Offices with the given ids; unknown ids are skipped
    async fn find_offices(&self, ids: Vec<Uuid>) -> AppResult<Vec<Office>>;
    async fn create_office(&self, office_number: String) -> AppResult<Office>;
    async fn update_office(&self, id: Uuid, office_number: String) -> AppResult<Office>;
    async fn delete_office(&self, id: Uuid) -> AppResult<()>;

    // Services
    async fn list_services(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<ServiceDetails>, u64)>;
    async fn find_service(&self, id: Uuid) -> AppResult<Option<ServiceDetails>>;
    async fn delete_service(&self, id: Uuid) -> AppResult<()>;
    async fn count_services(&self) -> AppResult<u64>;
}

/// Concrete implementation of CatalogRepository
pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn list_offices(&self, params: &PaginationParams) -> AppResult<(Vec<Office>, u64)> {
        let (models, total) = base::fetch_page(
            office::Entity::find().order_by_asc(office::Column::OfficeNumber),
            &self.db,
            params,
        )
        .await?;
        Ok((models.into_iter().map(Office::from).collect(), total))
    }

    async fn find_office(&self, id: Uuid) -> AppResult<Option<Office>> {
        let model = office::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Office::from))
    }

    async fn find_offices(&self, ids: Vec<Uuid>) -> AppResult<Vec<Office>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = office::Entity::find()
            .filter(office::Column::Id.is_in(ids))
            .order_by_asc(office::Column::OfficeNumber)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Office::from).collect())
    }

    async fn create_office(&self, office_number: String) -> AppResult<Office> {
        let model = office::ActiveModel {
            id: Set(Uuid::new_v4()),
            office_number: Set(office_number),
        }
        .insert(&self.db)
        .await?;
        Ok(Office::from(model))
    }

    async fn update_office(&self, id: Uuid, office_number: String) -> AppResult<Office> {
        let model = office::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: office::ActiveModel = model.into();
        active.office_number = Set(office_number);
        let model = active.update(&self.db).await?;
        Ok(Office::from(model))
    }

    async fn delete_office(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<office::Entity, _>(id, &self.db).await
    }

    async fn list_services(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<ServiceDetails>, u64)> {
        let (models, total) = base::fetch_page(
            service::Entity::find()
                .order_by_asc(service::Column::Name)
                .order_by_asc(service::Column::Id),
            &self.db,
            params,
        )
        .await?;
        Ok((service_details(&self.db, models).await?, total))
    }

    async fn find_service(&self, id: Uuid) -> AppResult<Option<ServiceDetails>> {
        find_service(&self.db, id).await
    }

    async fn delete_service(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<service::Entity, _>(id, &self.db).await
    }

    async fn count_services(&self) -> AppResult<u64> {
        base::count(service::Entity::find(), &self.db).await
    }
}

pub(crate) async fn find_service<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<ServiceDetails>> {
    let models: Vec<_> = service::Entity::find_by_id(id)
        .one(db)
        .await?
        .into_iter()
        .collect();
    Ok(service_details(db, models).await?.pop())
}

/// Insert a service row and its office and doctor links.
pub(crate) async fn insert_service<C: ConnectionTrait>(
    db: &C,
    input: ServiceInput,
) -> AppResult<ServiceDetails> {
    let id = Uuid::new_v4();
    service::ActiveModel {
        id: Set(id),
        name: Set(input.name),
        description: Set(input.description),
        cost: Set(input.cost),
    }
    .insert(db)
    .await?;

    insert_links(db, id, &input.office_ids, &input.doctor_ids).await?;
    find_service(db, id).await?.ok_or(AppError::NotFound)
}

/// Overwrite a service row and replace all of its links.
pub(crate) async fn replace_service<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: ServiceInput,
) -> AppResult<ServiceDetails> {
    let model = service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: service::ActiveModel = model.into();
    active.name = Set(input.name);
    active.description = Set(input.description);
    active.cost = Set(input.cost);
    active.update(db).await?;

    service_office::Entity::delete_many()
        .filter(service_office::Column::ServiceId.eq(id))
        .exec(db)
        .await?;
    service_doctor::Entity::delete_many()
        .filter(service_doctor::Column::ServiceId.eq(id))
        .exec(db)
        .await?;

    insert_links(db, id, &input.office_ids, &input.doctor_ids).await?;
    find_service(db, id).await?.ok_or(AppError::NotFound)
}

async fn insert_links<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    office_ids: &[Uuid],
    doctor_ids: &[Uuid],
) -> AppResult<()> {
    let offices: Vec<service_office::ActiveModel> = unique(office_ids)
        .into_iter()
        .map(|office_id| service_office::ActiveModel {
            service_id: Set(service_id),
            office_id: Set(office_id),
        })
        .collect();
    if !offices.is_empty() {
        service_office::Entity::insert_many(offices)
            .exec_without_returning(db)
            .await?;
    }

    let doctors: Vec<service_doctor::ActiveModel> = unique(doctor_ids)
        .into_iter()
        .map(|doctor_id| service_doctor::ActiveModel {
            service_id: Set(service_id),
            doctor_id: Set(doctor_id),
        })
        .collect();
    if !doctors.is_empty() {
        service_doctor::Entity::insert_many(doctors)
            .exec_without_returning(db)
            .await?;
    }

    Ok(())
}

async fn service_details<C: ConnectionTrait>(
    db: &C,
    models: Vec<service::Model>,
) -> AppResult<Vec<ServiceDetails>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

    let office_rows = service_office::Entity::find()
        .filter(service_office::Column::ServiceId.is_in(ids.clone()))
        .find_also_related(office::Entity)
        .order_by_asc(office::Column::OfficeNumber)
        .all(db)
        .await?;
    let mut offices: HashMap<Uuid, Vec<Office>> = HashMap::new();
    for (link, office) in office_rows {
        if let Some(office) = office {
            offices
                .entry(link.service_id)
                .or_default()
                .push(Office::from(office));
        }
    }

    let doctor_rows = service_doctor::Entity::find()
        .filter(service_doctor::Column::ServiceId.is_in(ids))
        .all(db)
        .await?;
    let doctor_ids = unique(&doctor_rows.iter().map(|r| r.doctor_id).collect::<Vec<_>>());
    let doctor_by_id: HashMap<Uuid, DoctorDetails> = find_doctors(db, doctor_ids)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();
    let mut doctors: HashMap<Uuid, Vec<DoctorDetails>> = HashMap::new();
    for row in doctor_rows {
        if let Some(doctor) = doctor_by_id.get(&row.doctor_id) {
            doctors.entry(row.service_id).or_default().push(doctor.clone());
        }
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let mut service_doctors = doctors.remove(&model.id).unwrap_or_default();
            service_doctors.sort_by(|a, b| a.display.cmp(&b.display));
            ServiceDetails {
                offices: offices.remove(&model.id).unwrap_or_default(),
                doctors: service_doctors,
                service: Service::from(model),
            }
        })
        .collect())
}

/// Ids in first-seen order without repeats.
pub(crate) fn unique(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
