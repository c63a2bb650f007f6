//! Patient repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::base;
use super::entities::patient;
use crate::domain::{Patient, PatientInput};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Patient repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// List patients ordered by full name
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Patient>, u64)>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Patient>>;

    /// Patient card linked to an account, if any
    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Option<Patient>>;

    async fn create(&self, input: PatientInput) -> AppResult<Patient>;

    async fn update(&self, id: Uuid, input: PatientInput) -> AppResult<Patient>;

    /// Delete the card; its medical tests and appointments go with it
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of PatientRepository
pub struct PatientStore {
    db: DatabaseConnection,
}

impl PatientStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatientRepository for PatientStore {
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Patient>, u64)> {
        let (models, total) = base::fetch_page(
            patient::Entity::find()
                .order_by_asc(patient::Column::FullName)
                .order_by_asc(patient::Column::Id),
            &self.db,
            params,
        )
        .await?;
        Ok((models.into_iter().map(Patient::from).collect(), total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Patient>> {
        let model = patient::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Patient::from))
    }

    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Option<Patient>> {
        find_by_account(&self.db, account_id).await
    }

    async fn create(&self, input: PatientInput) -> AppResult<Patient> {
        insert(&self.db, input).await
    }

    async fn update(&self, id: Uuid, input: PatientInput) -> AppResult<Patient> {
        let model = patient::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active = patient_fields(input);
        active.id = ActiveValue::Unchanged(model.id);
        let model = active.update(&self.db).await?;
        Ok(Patient::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<patient::Entity, _>(id, &self.db).await
    }

    async fn count(&self) -> AppResult<u64> {
        base::count(patient::Entity::find(), &self.db).await
    }
}

pub(crate) async fn find_by_account<C: ConnectionTrait>(
    db: &C,
    account_id: Uuid,
) -> AppResult<Option<Patient>> {
    let model = patient::Entity::find()
        .filter(patient::Column::AccountId.eq(account_id))
        .one(db)
        .await?;
    Ok(model.map(Patient::from))
}

pub(crate) async fn insert<C: ConnectionTrait>(db: &C, input: PatientInput) -> AppResult<Patient> {
    let mut active = patient_fields(input);
    active.id = Set(Uuid::new_v4());
    let model = active.insert(db).await?;
    Ok(Patient::from(model))
}

fn patient_fields(input: PatientInput) -> patient::ActiveModel {
    patient::ActiveModel {
        id: ActiveValue::NotSet,
        account_id: Set(input.account_id),
        full_name: Set(input.full_name),
        email: Set(input.email),
        gender: Set(input.gender.code().to_string()),
        phone_number: Set(input.phone_number),
        address: Set(input.address),
        passport_id: Set(input.passport_id),
        birth_date: Set(input.birth_date),
    }
}
