//! Authentication service - Login, patient sign-up and principal resolution.
//!
//! Passwords are handled by the domain `Password` value object. Every
//! request resolves its caller to a `Principal` here, with role groups and
//! the linked patient card read fresh from storage.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, MIN_PASSWORD_LENGTH, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    ensure_not_blank, validate_input, Account, Password, Patient, PatientInput, Role, SignUp,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{NewAccountRecord, UnitOfWork};
use crate::policy::{Action, Principal, Resource};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub username: String,
    /// Role group names at issue time
    pub groups: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Result of a successful sign-up: the new patient card and a session token
#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpResponse {
    pub patient: Patient,
    pub token: TokenResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a bearer token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Self-service registration: account, Patient group membership and
    /// patient card in one transaction, then a token for the new account
    async fn sign_up(&self, principal: &Principal, form: SignUp) -> AppResult<SignUpResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve the caller of a request. No token means anonymous.
    async fn resolve_principal(&self, token: Option<&str>) -> AppResult<Principal>;
}

/// Generate JWT token for an account
fn generate_token(account: &Account, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: account.id,
        username: account.username.clone(),
        groups: account
            .roles
            .iter()
            .map(|role| role.group_name().to_string())
            .collect(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let account = self.uow.accounts().find_by_username(&username).await?;

        // Verify against a dummy hash when the account is unknown so the
        // response time does not reveal which usernames exist.
        let password_valid = Password::verify_stored(
            account.as_ref().map(|a| a.password_hash.as_str()),
            &password,
        );

        match account {
            Some(account) if password_valid && account.is_active => {
                tracing::info!(account_id = %account.id, "Login succeeded");
                generate_token(&account, &self.config)
            }
            _ => {
                tracing::debug!(%username, "Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn sign_up(&self, principal: &Principal, form: SignUp) -> AppResult<SignUpResponse> {
        principal.authorize(Resource::Registration, Action::Create)?;
        validate_input(&form)?;
        ensure_not_blank("last_name", &form.last_name)?;
        ensure_not_blank("first_name", &form.first_name)?;
        ensure_not_blank("patronymic", &form.patronymic)?;

        if form.password1 != form.password2 {
            return Err(AppError::invalid_field("password2", "passwords do not match"));
        }
        let password_hash = match Password::new(&form.password1) {
            Ok(password) => password.into_string(),
            Err(AppError::Validation(_)) => {
                return Err(AppError::invalid_field(
                    "password1",
                    format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
                ))
            }
            Err(e) => return Err(e),
        };

        if self
            .uow
            .accounts()
            .find_by_username(&form.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Account"));
        }

        let full_name = form.full_name();
        let record = NewAccountRecord {
            username: form.username,
            password_hash,
            email: form.email.clone(),
            first_name: form.first_name,
            last_name: form.last_name,
            roles: vec![Role::Patient],
        };
        let card = PatientInput {
            account_id: Uuid::nil(),
            full_name,
            email: form.email,
            gender: form.gender,
            phone_number: form.phone_number,
            address: None,
            passport_id: form.passport_id,
            birth_date: form.birth_date,
        };

        let (account, patient) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let account = ctx.accounts().create(record).await?;
                    let patient = ctx
                        .patients()
                        .create(PatientInput {
                            account_id: account.id,
                            ..card
                        })
                        .await?;
                    Ok((account, patient))
                })
            })
            .await?;

        tracing::info!(account_id = %account.id, patient_id = %patient.id, "Patient signed up");
        let token = generate_token(&account, &self.config)?;
        Ok(SignUpResponse { patient, token })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn resolve_principal(&self, token: Option<&str>) -> AppResult<Principal> {
        let Some(token) = token else {
            return Ok(Principal::anonymous());
        };

        let claims = self.verify_token(token)?;
        let account = self
            .uow
            .accounts()
            .find_by_id(claims.sub)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AppError::Unauthorized)?;

        let patient_id = if account.has_role(Role::Patient) {
            self.uow
                .patients()
                .find_by_account(account.id)
                .await?
                .map(|patient| patient.id)
        } else {
            None
        };

        Ok(Principal::authenticated(account.id, account.roles, patient_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use crate::services::testing::{account, test_config, Repositories, TestUnitOfWork};

    fn authenticator(repos: Repositories) -> Authenticator<TestUnitOfWork> {
        Authenticator::new(repos.into_uow(), test_config())
    }

    fn sign_up_form() -> SignUp {
        SignUp {
            username: "ivanov".to_string(),
            password1: "SecurePass123!".to_string(),
            password2: "SecurePass123!".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Ivanov".to_string(),
            patronymic: "Ivanovich".to_string(),
            gender: Gender::Male,
            birth_date: None,
            passport_id: None,
            phone_number: None,
            email: "i@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_invalid_credentials() {
        let mut repos = Repositories::default();
        repos.accounts
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let result = authenticator(repos)
            .login("ghost".to_string(), "whatever1".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_issues_token_with_groups() {
        let stored = account("doctor", "SecurePass123!", vec![Role::Doctor]);
        let mut repos = Repositories::default();
        let found = stored.clone();
        repos.accounts
            .expect_find_by_username()
            .returning(move |_| Ok(Some(found.clone())));
        let auth = authenticator(repos);

        let token = auth
            .login("doctor".to_string(), "SecurePass123!".to_string())
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, stored.id);
        assert_eq!(claims.groups, vec!["Врач".to_string()]);
    }

    #[tokio::test]
    async fn test_login_refuses_inactive_account() {
        let mut stored = account("former", "SecurePass123!", vec![Role::Doctor]);
        stored.is_active = false;
        let mut repos = Repositories::default();
        repos.accounts
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));

        let result = authenticator(repos)
            .login("former".to_string(), "SecurePass123!".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_missing_token_resolves_to_anonymous() {
        let principal = authenticator(Repositories::default())
            .resolve_principal(None)
            .await
            .unwrap();
        assert!(principal.is_anonymous());
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let result = authenticator(Repositories::default())
            .resolve_principal(Some("not-a-jwt"))
            .await;
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[tokio::test]
    async fn test_principal_carries_patient_card() {
        let stored = account("ivanov", "SecurePass123!", vec![Role::Patient]);
        let patient_id = Uuid::new_v4();
        let token = generate_token(&stored, &test_config()).unwrap();

        let mut repos = Repositories::default();
        let found = stored.clone();
        repos.accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        let account_id = stored.id;
        repos.patients
            .expect_find_by_account()
            .withf(move |id| *id == account_id)
            .returning(move |account_id| {
                Ok(Some(Patient {
                    id: patient_id,
                    account_id,
                    full_name: "Ivanov Ivan Ivanovich".to_string(),
                    email: String::new(),
                    gender: Gender::Male,
                    phone_number: None,
                    address: None,
                    passport_id: None,
                    birth_date: None,
                }))
            });

        let principal = authenticator(repos)
            .resolve_principal(Some(&token.access_token))
            .await
            .unwrap();
        assert_eq!(principal.account_id(), Some(stored.id));
        assert_eq!(principal.patient_id(), Some(patient_id));
        assert_eq!(principal.roles(), &[Role::Patient]);
    }

    #[tokio::test]
    async fn test_deleted_account_token_is_unauthorized() {
        let stored = account("gone", "SecurePass123!", vec![Role::Doctor]);
        let token = generate_token(&stored, &test_config()).unwrap();
        let mut repos = Repositories::default();
        repos.accounts.expect_find_by_id().returning(|_| Ok(None));

        let result = authenticator(repos)
            .resolve_principal(Some(&token.access_token))
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_mismatched_passwords_before_storage() {
        let form = SignUp {
            password2: "Different123!".to_string(),
            ..sign_up_form()
        };
        let result = authenticator(Repositories::default())
            .sign_up(&Principal::anonymous(), form)
            .await;
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.starts_with("password2:")),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_sign_up_rejects_whitespace_name_parts() {
        let form = SignUp {
            patronymic: "  ".to_string(),
            ..sign_up_form()
        };
        let result = authenticator(Repositories::default())
            .sign_up(&Principal::anonymous(), form)
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "patronymic: must not be blank"
        );
    }

    #[tokio::test]
    async fn test_sign_up_rejects_taken_username() {
        let mut repos = Repositories::default();
        repos.accounts
            .expect_find_by_username()
            .returning(|name| Ok(Some(account(name, "SecurePass123!", vec![Role::Patient]))));

        let result = authenticator(repos)
            .sign_up(&Principal::anonymous(), sign_up_form())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
