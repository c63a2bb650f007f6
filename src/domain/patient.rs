//! Patient cards and self-service registration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validation::PHONE_RE;
use super::{AppointmentDetails, Gender, MedicalTestDetails};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Patient {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub passport_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl Patient {
    /// `"Пациент <full name>"`
    pub fn display(&self) -> String {
        format!("Пациент {}", self.full_name)
    }
}

/// Patient card payload used by administrators
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PatientInput {
    pub account_id: Uuid,
    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub full_name: String,
    #[serde(default)]
    #[validate(length(max = 70, message = "must be at most 70 characters"))]
    pub email: String,
    #[serde(default)]
    pub gender: Gender,
    #[validate(
        length(max = 15, message = "must be at most 15 characters"),
        regex(path = *PHONE_RE, message = "must contain digits only")
    )]
    pub phone_number: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 11, message = "must be at most 11 characters"))]
    pub passport_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Self-service registration form. Creates the account and the patient card.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUp {
    #[validate(length(min = 1, max = 150, message = "must be 1 to 150 characters"))]
    #[schema(example = "ivanov")]
    pub username: String,
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password1: String,
    /// Must repeat `password1`
    pub password2: String,
    #[validate(length(min = 1, max = 80, message = "must be 1 to 80 characters"))]
    #[schema(example = "Ivan")]
    pub first_name: String,
    #[validate(length(min = 1, max = 80, message = "must be 1 to 80 characters"))]
    #[schema(example = "Ivanov")]
    pub last_name: String,
    #[validate(length(min = 1, max = 80, message = "must be 1 to 80 characters"))]
    #[schema(example = "Ivanovich")]
    pub patronymic: String,
    #[serde(default)]
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(max = 11, message = "must be at most 11 characters"))]
    pub passport_id: Option<String>,
    #[validate(
        length(max = 15, message = "must be at most 15 characters"),
        regex(path = *PHONE_RE, message = "must contain digits only")
    )]
    pub phone_number: Option<String>,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 70, message = "must be at most 70 characters")
    )]
    #[schema(example = "i@example.com")]
    pub email: String,
}

impl SignUp {
    /// Surname, given name and patronymic separated by single spaces.
    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.patronymic]
            .iter()
            .map(|part| part.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Patient card together with its appointments and medical tests.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PatientRecord {
    pub patient: Patient,
    pub appointments: Vec<AppointmentDetails>,
    pub medical_tests: Vec<MedicalTestDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate_input;

    fn sign_up() -> SignUp {
        SignUp {
            username: "ivanov".to_string(),
            password1: "SecurePass123!".to_string(),
            password2: "SecurePass123!".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Ivanov".to_string(),
            patronymic: "Ivanovich".to_string(),
            gender: Gender::Male,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
            passport_id: Some("AB123456".to_string()),
            phone_number: Some("+100000".to_string()),
            email: "i@example.com".to_string(),
        }
    }

    #[test]
    fn test_full_name_joins_surname_first() {
        assert_eq!(sign_up().full_name(), "Ivanov Ivan Ivanovich");
    }

    #[test]
    fn test_full_name_trims_parts() {
        let form = SignUp {
            first_name: " Ivan ".to_string(),
            ..sign_up()
        };
        assert_eq!(form.full_name(), "Ivanov Ivan Ivanovich");
    }

    #[test]
    fn test_sign_up_form_valid() {
        assert!(validate_input(&sign_up()).is_ok());
    }

    #[test]
    fn test_sign_up_form_from_json() {
        let form: SignUp = serde_json::from_value(serde_json::json!({
            "username": "ivanov",
            "password1": "SecurePass123!",
            "password2": "SecurePass123!",
            "first_name": "Ivan",
            "last_name": "Ivanov",
            "patronymic": "Ivanovich",
            "gender": "м",
            "birth_date": "1990-01-01",
            "passport_id": "AB123456",
            "phone_number": "+100000",
            "email": "i@example.com"
        }))
        .unwrap();
        assert_eq!(form.gender, Gender::Male);
        assert_eq!(form.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1));
    }

    #[test]
    fn test_patient_input_defaults() {
        let input: PatientInput =
            serde_json::from_value(serde_json::json!({ "account_id": Uuid::new_v4() })).unwrap();
        assert_eq!(input.full_name, "");
        assert_eq!(input.email, "");
        assert_eq!(input.gender, Gender::Unspecified);
    }

    #[test]
    fn test_patient_display() {
        let patient = Patient {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            full_name: "Ivanov Ivan Ivanovich".to_string(),
            email: String::new(),
            gender: Gender::Male,
            phone_number: None,
            address: None,
            passport_id: None,
            birth_date: None,
        };
        assert_eq!(patient.display(), "Пациент Ivanov Ivan Ivanovich");
    }
}
