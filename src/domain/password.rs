//! Account password value object.
//!
//! Wraps the Argon2 hash stored with each account. Plain-text passwords
//! never leave this module except as input.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hash compared against when an account does not exist, so a failed login
/// costs the same whether or not the username is known.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$0nvWkXjgPm3Vr5bXW4z3kmbWqyhJgOp9f2lgfVd7y2M";

/// Hashed account password.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a new plain-text password.
    ///
    /// # Errors
    /// `Validation` if the password is shorter than `MIN_PASSWORD_LENGTH`
    /// characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_field(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a plain-text candidate. Malformed stored hashes never match.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }

    /// Verify against a stored hash that may be absent.
    ///
    /// Runs a full verification against a dummy hash when `stored` is `None`
    /// and always reports failure in that case.
    pub fn verify_stored(stored: Option<&str>, plain_text: &str) -> bool {
        match stored {
            Some(hash) => Self::from_hash(hash.to_string()).verify(plain_text),
            None => {
                let _ = Self::from_hash(DUMMY_HASH.to_string()).verify(plain_text);
                false
            }
        }
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = Password::new("CorrectHorse42").unwrap();

        assert!(password.verify("CorrectHorse42"));
        assert!(!password.verify("correcthorse42"));
    }

    #[test]
    fn test_restored_hash_verifies() {
        let hash = Password::new("RestoreMe123").unwrap().into_string();
        assert!(Password::from_hash(hash).verify("RestoreMe123"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = Password::new("SamePassword1").unwrap();
        let second = Password::new("SamePassword1").unwrap();
        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_too_short_names_field() {
        let err = Password::new("short").unwrap_err();
        assert!(err.to_string().starts_with("password:"));
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn test_verify_stored_without_account_fails() {
        assert!(!Password::verify_stored(None, "anything-at-all"));
        let hash = Password::new("Present123").unwrap().into_string();
        assert!(Password::verify_stored(Some(&hash), "Present123"));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!Password::from_hash("not-a-hash".to_string()).verify("not-a-hash"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("Redacted123").unwrap();
        assert!(!format!("{:?}", password).contains(password.as_str()));
    }
}
