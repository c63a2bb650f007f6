//! Service test fixtures: a unit of work over repository mocks.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Account, Password, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    AccountRepository, CatalogRepository, MockAccountRepository, MockCatalogRepository,
    MockPatientRepository, MockRecordRepository, MockStaffRepository, PatientRepository,
    RecordRepository, StaffRepository, TransactionContext, UnitOfWork,
};
use crate::policy::Principal;

/// Repository mocks to configure before building the unit of work.
/// A mock without expectations panics when called.
#[derive(Default)]
pub struct Repositories {
    pub accounts: MockAccountRepository,
    pub staff: MockStaffRepository,
    pub catalog: MockCatalogRepository,
    pub patients: MockPatientRepository,
    pub records: MockRecordRepository,
}

impl Repositories {
    pub fn into_uow(self) -> Arc<TestUnitOfWork> {
        Arc::new(TestUnitOfWork {
            accounts: Arc::new(self.accounts),
            staff: Arc::new(self.staff),
            catalog: Arc::new(self.catalog),
            patients: Arc::new(self.patients),
            records: Arc::new(self.records),
        })
    }
}

pub struct TestUnitOfWork {
    accounts: Arc<MockAccountRepository>,
    staff: Arc<MockStaffRepository>,
    catalog: Arc<MockCatalogRepository>,
    patients: Arc<MockPatientRepository>,
    records: Arc<MockRecordRepository>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn staff(&self) -> Arc<dyn StaffRepository> {
        self.staff.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog.clone()
    }

    fn patients(&self) -> Arc<dyn PatientRepository> {
        self.patients.clone()
    }

    fn records(&self) -> Arc<dyn RecordRepository> {
        self.records.clone()
    }

    /// Transactions need a database; see the integration tests.
    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("transactions are not available in unit tests"))
    }
}

pub fn test_config() -> Config {
    Config::new("sqlite::memory:", "test-secret-key-that-is-long-enough!!")
        .expect("test config")
}

pub fn account(username: &str, password: &str, roles: Vec<Role>) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash: Password::new(password).expect("hash").into_string(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        is_active: true,
        roles,
        created_at: now,
        updated_at: now,
    }
}

pub fn administrator() -> Principal {
    Principal::authenticated(Uuid::new_v4(), vec![Role::Administrator], None)
}

pub fn doctor() -> Principal {
    Principal::authenticated(Uuid::new_v4(), vec![Role::Doctor], None)
}

pub fn patient(patient_id: Uuid) -> Principal {
    Principal::authenticated(Uuid::new_v4(), vec![Role::Patient], Some(patient_id))
}
