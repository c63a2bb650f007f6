//! Account service - Administration of login accounts and their groups.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    validate_input, AccountResponse, AccountUpdate, NewAccount, Password, Role,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NewAccountRecord, UnitOfWork};
use crate::policy::{Action, Principal, Resource};
use crate::types::{Paginated, PaginationParams};

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn list(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<AccountResponse>>;

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<AccountResponse>;

    async fn create(&self, principal: &Principal, input: NewAccount)
        -> AppResult<AccountResponse>;

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: AccountUpdate,
    ) -> AppResult<AccountResponse>;

    /// Create an Administrator account outside any request. Used by the
    /// `create-admin` command to seed the first administrator.
    async fn bootstrap_administrator(
        &self,
        username: String,
        password: String,
        email: Option<String>,
    ) -> AppResult<AccountResponse>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn insert(&self, input: NewAccount) -> AppResult<AccountResponse> {
        validate_input(&input)?;
        let password_hash = Password::new(&input.password)?.into_string();

        if self
            .uow
            .accounts()
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Account"));
        }

        let account = self
            .uow
            .accounts()
            .create(NewAccountRecord {
                username: input.username,
                password_hash,
                email: input.email.unwrap_or_default(),
                first_name: input.first_name,
                last_name: input.last_name,
                roles: input.roles,
            })
            .await?;

        tracing::info!(account_id = %account.id, roles = ?account.roles, "Account created");
        Ok(account.into())
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn list(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<AccountResponse>> {
        principal.authorize(Resource::Account, Action::List)?;
        let (accounts, total) = self.uow.accounts().list(&params).await?;
        let data = accounts.into_iter().map(AccountResponse::from).collect();
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<AccountResponse> {
        principal.authorize(Resource::Account, Action::View)?;
        self.uow
            .accounts()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
            .map(AccountResponse::from)
    }

    async fn create(
        &self,
        principal: &Principal,
        input: NewAccount,
    ) -> AppResult<AccountResponse> {
        principal.authorize(Resource::Account, Action::Create)?;
        self.insert(input).await
    }

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: AccountUpdate,
    ) -> AppResult<AccountResponse> {
        principal.authorize(Resource::Account, Action::Update)?;
        validate_input(&input)?;
        let account = self.uow.accounts().update(id, input).await?;
        tracing::info!(account_id = %account.id, "Account updated");
        Ok(account.into())
    }

    async fn bootstrap_administrator(
        &self,
        username: String,
        password: String,
        email: Option<String>,
    ) -> AppResult<AccountResponse> {
        self.insert(NewAccount {
            username,
            password,
            email,
            first_name: String::new(),
            last_name: String::new(),
            roles: vec![Role::Administrator],
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{account, administrator, doctor, Repositories};

    fn new_account(username: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password: "SecurePass123!".to_string(),
            email: Some("a@clinic.example".to_string()),
            first_name: "Anna".to_string(),
            last_name: "Petrova".to_string(),
            roles: vec![Role::Doctor],
        }
    }

    #[tokio::test]
    async fn test_doctor_cannot_list_accounts() {
        let service = AccountManager::new(Repositories::default().into_uow());
        let result = service.list(&doctor(), PaginationParams::default()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_anonymous_cannot_create_accounts() {
        let service = AccountManager::new(Repositories::default().into_uow());
        let result = service
            .create(&Principal::anonymous(), new_account("anna"))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_create_hashes_password_and_keeps_roles() {
        let mut repos = Repositories::default();
        repos
            .accounts
            .expect_find_by_username()
            .returning(|_| Ok(None));
        repos
            .accounts
            .expect_create()
            .withf(|record| {
                record.username == "anna"
                    && record.password_hash.starts_with("$argon2")
                    && record.roles == vec![Role::Doctor]
            })
            .returning(|record| {
                let mut created = account(&record.username, "SecurePass123!", record.roles);
                created.email = record.email;
                Ok(created)
            });

        let service = AccountManager::new(repos.into_uow());
        let created = service
            .create(&administrator(), new_account("anna"))
            .await
            .unwrap();
        assert_eq!(created.username, "anna");
        assert_eq!(created.email, "a@clinic.example");
        assert_eq!(created.roles, vec![Role::Doctor]);
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let service = AccountManager::new(Repositories::default().into_uow());
        let input = NewAccount {
            password: "short".to_string(),
            ..new_account("anna")
        };
        let result = service.create(&administrator(), input).await;
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.starts_with("password:")),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_get_missing_account_is_not_found() {
        let mut repos = Repositories::default();
        repos.accounts.expect_find_by_id().returning(|_| Ok(None));
        let service = AccountManager::new(repos.into_uow());

        let result = service.get(&administrator(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_bootstrap_administrator_needs_no_principal() {
        let mut repos = Repositories::default();
        repos
            .accounts
            .expect_find_by_username()
            .returning(|_| Ok(None));
        repos
            .accounts
            .expect_create()
            .withf(|record| record.roles == vec![Role::Administrator])
            .returning(|record| Ok(account(&record.username, "SecurePass123!", record.roles)));
        let service = AccountManager::new(repos.into_uow());

        let admin = service
            .bootstrap_administrator("root".to_string(), "SecurePass123!".to_string(), None)
            .await
            .unwrap();
        assert_eq!(admin.roles, vec![Role::Administrator]);
    }
}
