//! Authentication accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Role;

/// Login account. Patients and employees each link to exactly one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Account creation payload (administrators only)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewAccount {
    #[validate(length(min = 1, max = 150, message = "must be 1 to 150 characters"))]
    #[schema(example = "ivanova")]
    pub username: String,
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "ivanova@clinic.example")]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150, message = "must be at most 150 characters"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "must be at most 150 characters"))]
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Account update payload (administrators only)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AccountUpdate {
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "must be at most 150 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "must be at most 150 characters"))]
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    /// Replaces the account's groups when present
    pub roles: Option<Vec<Role>>,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    #[schema(example = "ivanova")]
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            is_active: account.is_active,
            roles: account.roles,
            created_at: account.created_at,
        }
    }
}
