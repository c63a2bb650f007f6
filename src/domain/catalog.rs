//! Offices and the services offered in them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::DoctorDetails;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Office {
    pub id: Uuid,
    #[schema(example = "214")]
    pub office_number: String,
}

impl std::fmt::Display for Office {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.office_number)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OfficeInput {
    #[validate(length(min = 1, max = 4, message = "must be 1 to 4 characters"))]
    pub office_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    #[schema(example = "Консультация кардиолога")]
    pub name: String,
    pub description: Option<String>,
    /// Price in whole currency units; `None` when not published
    pub cost: Option<i32>,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ServiceInput {
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub cost: Option<i32>,
    /// Offices where the service is provided
    #[serde(default)]
    pub office_ids: Vec<Uuid>,
    /// Doctors who provide the service
    #[serde(default)]
    pub doctor_ids: Vec<Uuid>,
}

/// Service with its offices and doctors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ServiceDetails {
    #[serde(flatten)]
    pub service: Service,
    pub offices: Vec<Office>,
    pub doctors: Vec<DoctorDetails>,
}

/// Public landing summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Overview {
    pub num_services: u64,
    pub num_doctors: u64,
    pub num_patients: u64,
    pub doctors: Vec<DoctorDetails>,
    pub services: Vec<Service>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate_input;

    #[test]
    fn test_service_input_defaults_links() {
        let input: ServiceInput =
            serde_json::from_str(r#"{"name": "ЭКГ", "description": null, "cost": null}"#).unwrap();
        assert!(input.office_ids.is_empty());
        assert!(input.doctor_ids.is_empty());
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn test_service_input_rejects_negative_cost_and_blank_name() {
        let input = ServiceInput {
            name: String::new(),
            description: None,
            cost: Some(-5),
            office_ids: vec![],
            doctor_ids: vec![],
        };
        let message = validate_input(&input).unwrap_err().to_string();
        assert!(message.contains("cost: must not be negative"));
        assert!(message.contains("name: must be 1 to 255 characters"));
    }

    #[test]
    fn test_office_number_length() {
        let too_long = OfficeInput {
            office_number: "12345".to_string(),
        };
        assert!(validate_input(&too_long).is_err());
        let ok = OfficeInput {
            office_number: "101".to_string(),
        };
        assert!(validate_input(&ok).is_ok());
    }
}
