//! Service Container - Centralized service access with parallel execution support.
//!
//! Features:
//! - Centralized access to all application services
//! - Thread-safe concurrent access via Arc
//! - Parallel execution helpers for independent storage reads

use std::future::Future;
use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, CatalogManager, CatalogService,
    PatientManager, PatientService, RecordManager, RecordService, StaffManager, StaffService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn staff(&self) -> Arc<dyn StaffService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn patients(&self) -> Arc<dyn PatientService>;

    fn records(&self) -> Arc<dyn RecordService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    staff_service: Arc<dyn StaffService>,
    catalog_service: Arc<dyn CatalogService>,
    patient_service: Arc<dyn PatientService>,
    record_service: Arc<dyn RecordService>,
}

impl Services {
    /// Create service container from database connection and config.
    ///
    /// All services share one unit of work over the connection pool.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            account_service: Arc::new(AccountManager::new(uow.clone())),
            staff_service: Arc::new(StaffManager::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            patient_service: Arc::new(PatientManager::new(uow.clone())),
            record_service: Arc::new(RecordManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn staff(&self) -> Arc<dyn StaffService> {
        self.staff_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn patients(&self) -> Arc<dyn PatientService> {
        self.patient_service.clone()
    }

    fn records(&self) -> Arc<dyn RecordService> {
        self.record_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use futures::future::{try_join, try_join3};

    /// Execute two independent async operations in parallel.
    ///
    /// Both operations run concurrently and the function returns when both complete.
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (appointments, medical_tests) = parallel::join2(
    ///     records.appointments_for_patient(id),
    ///     records.medical_tests_for_patient(id),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join(f1, f2).await
    }

    /// Execute three independent async operations in parallel.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join3(f1, f2, f3).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn test_parallel_join3_fails_fast() {
        async fn ok() -> AppResult<u64> {
            Ok(7)
        }
        async fn missing() -> AppResult<u64> {
            Err(AppError::NotFound)
        }

        let result = parallel::join3(ok(), missing(), ok()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
