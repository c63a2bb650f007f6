//! Account repository: login accounts and their role groups.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::base;
use super::entities::{account, account_group};
use crate::domain::{Account, AccountUpdate, Role};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account to insert, with the password already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccountRecord {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
}

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID with its role groups
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by login name
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// List accounts ordered by username
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Account>, u64)>;

    /// Create an account and its group memberships
    async fn create(&self, record: NewAccountRecord) -> AppResult<Account>;

    /// Apply an update; `roles`, when present, replaces all memberships
    async fn update(&self, id: Uuid, update: AccountUpdate) -> AppResult<Account>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let model = account::Entity::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        match model {
            Some(model) => with_roles(&self.db, model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Account>, u64)> {
        let (models, total) = base::fetch_page(
            account::Entity::find().order_by_asc(account::Column::Username),
            &self.db,
            params,
        )
        .await?;

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut roles = roles_by_account(&self.db, ids).await?;
        let accounts = models
            .into_iter()
            .map(|m| {
                let account_roles = roles.remove(&m.id).unwrap_or_default();
                m.into_account(account_roles)
            })
            .collect();

        Ok((accounts, total))
    }

    async fn create(&self, record: NewAccountRecord) -> AppResult<Account> {
        let txn = self.db.begin().await?;
        let account = insert(&txn, record).await?;
        txn.commit().await?;
        Ok(account)
    }

    async fn update(&self, id: Uuid, update: AccountUpdate) -> AppResult<Account> {
        let txn = self.db.begin().await?;

        let model = account::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: account::ActiveModel = model.into();
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(first_name) = update.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());
        let model = active.update(&txn).await?;

        if let Some(roles) = update.roles {
            account_group::Entity::delete_many()
                .filter(account_group::Column::AccountId.eq(id))
                .exec(&txn)
                .await?;
            insert_memberships(&txn, id, &roles).await?;
        }

        let account = with_roles(&txn, model).await?;
        txn.commit().await?;
        Ok(account)
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Account>> {
    match account::Entity::find_by_id(id).one(db).await? {
        Some(model) => with_roles(db, model).await.map(Some),
        None => Ok(None),
    }
}

/// Insert the account row and its memberships on `db`.
pub(crate) async fn insert<C: ConnectionTrait>(db: &C, record: NewAccountRecord) -> AppResult<Account> {
    let now = chrono::Utc::now();
    let id = Uuid::new_v4();
    let model = account::ActiveModel {
        id: Set(id),
        username: Set(record.username),
        password_hash: Set(record.password_hash),
        email: Set(record.email),
        first_name: Set(record.first_name),
        last_name: Set(record.last_name),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    insert_memberships(db, id, &record.roles).await?;
    Ok(model.into_account(dedup(record.roles)))
}

/// Add `account_id` to each group in `roles`.
pub(crate) async fn insert_memberships<C: ConnectionTrait>(
    db: &C,
    account_id: Uuid,
    roles: &[Role],
) -> AppResult<()> {
    let rows: Vec<account_group::ActiveModel> = dedup(roles.to_vec())
        .into_iter()
        .map(|role| account_group::ActiveModel {
            account_id: Set(account_id),
            group_name: Set(role.group_name().to_string()),
        })
        .collect();

    if rows.is_empty() {
        return Ok(());
    }

    account_group::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn with_roles<C: ConnectionTrait>(db: &C, model: account::Model) -> AppResult<Account> {
    let mut roles = roles_by_account(db, vec![model.id]).await?;
    let account_roles = roles.remove(&model.id).unwrap_or_default();
    Ok(model.into_account(account_roles))
}

async fn roles_by_account<C: ConnectionTrait>(
    db: &C,
    account_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, Vec<Role>>> {
    if account_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let memberships = account_group::Entity::find()
        .filter(account_group::Column::AccountId.is_in(account_ids))
        .all(db)
        .await?;

    let mut roles: HashMap<Uuid, Vec<Role>> = HashMap::new();
    for membership in memberships {
        // Groups outside the fixed set grant nothing
        if let Some(role) = Role::from_group_name(&membership.group_name) {
            roles.entry(membership.account_id).or_default().push(role);
        }
    }
    for list in roles.values_mut() {
        list.sort_by_key(|role| role.group_name());
    }
    Ok(roles)
}

fn dedup(mut roles: Vec<Role>) -> Vec<Role> {
    roles.sort_by_key(|role| role.group_name());
    roles.dedup();
    roles
}
