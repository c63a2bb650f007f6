//! Unit of Work pattern implementation.
//!
//! Centralizes access to the repositories and runs multi-row writes
//! (patient sign-up, services with their links) in one transaction.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    account_repository, catalog_repository, patient_repository, AccountRepository, AccountStore,
    CatalogRepository, CatalogStore, NewAccountRecord, PatientRepository, PatientStore,
    RecordRepository, RecordStore, StaffRepository, StaffStore,
};
use crate::domain::{Account, Patient, PatientInput, ServiceDetails, ServiceInput};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// Service tests implement it over the repository mocks instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn staff(&self) -> Arc<dyn StaffRepository>;

    fn catalog(&self) -> Arc<dyn CatalogRepository>;

    fn patients(&self) -> Arc<dyn PatientRepository>;

    fn records(&self) -> Arc<dyn RecordRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn accounts(&self) -> TxAccountRepository<'_> {
        TxAccountRepository { txn: self.txn }
    }

    pub fn patients(&self) -> TxPatientRepository<'_> {
        TxPatientRepository { txn: self.txn }
    }

    pub fn catalog(&self) -> TxCatalogRepository<'_> {
        TxCatalogRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    account_repo: Arc<AccountStore>,
    staff_repo: Arc<StaffStore>,
    catalog_repo: Arc<CatalogStore>,
    patient_repo: Arc<PatientStore>,
    record_repo: Arc<RecordStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            account_repo: Arc::new(AccountStore::new(db.clone())),
            staff_repo: Arc::new(StaffStore::new(db.clone())),
            catalog_repo: Arc::new(CatalogStore::new(db.clone())),
            patient_repo: Arc::new(PatientStore::new(db.clone())),
            record_repo: Arc::new(RecordStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.account_repo.clone()
    }

    fn staff(&self) -> Arc<dyn StaffRepository> {
        self.staff_repo.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog_repo.clone()
    }

    fn patients(&self) -> Arc<dyn PatientRepository> {
        self.patient_repo.clone()
    }

    fn records(&self) -> Arc<dyn RecordRepository> {
        self.record_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware account repository.
pub struct TxAccountRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxAccountRepository<'_> {
    /// Create an account with its group memberships
    pub async fn create(&self, record: NewAccountRecord) -> AppResult<Account> {
        account_repository::insert(self.txn, record).await
    }
}

/// Transaction-aware patient repository.
pub struct TxPatientRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxPatientRepository<'_> {
    pub async fn create(&self, input: PatientInput) -> AppResult<Patient> {
        patient_repository::insert(self.txn, input).await
    }
}

/// Transaction-aware catalog repository for service writes.
pub struct TxCatalogRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxCatalogRepository<'_> {
    /// Insert a service with its office and doctor links
    pub async fn create_service(&self, input: ServiceInput) -> AppResult<ServiceDetails> {
        catalog_repository::insert_service(self.txn, input).await
    }

    /// Overwrite a service and replace its links
    pub async fn update_service(&self, id: Uuid, input: ServiceInput) -> AppResult<ServiceDetails> {
        catalog_repository::replace_service(self.txn, id, input).await
    }
}
