//! Medical records owned by a patient: laboratory tests and appointments.
//!
//! Both kinds of record belong to exactly one patient and disappear with
//! it. The service, office and doctor they mention are weak references
//! that are cleared when the referenced row is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::DoctorDetails;

/// Shown in place of a doctor that has been removed.
const MISSING_DOCTOR: &str = "—";

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

// =============================================================================
// Medical test
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MedicalTest {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub name: String,
    pub result: String,
    pub patient_id: Uuid,
    pub service_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MedicalTestInput {
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    #[schema(example = "Общий анализ крови")]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub result: String,
    pub patient_id: Uuid,
    pub service_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MedicalTestDetails {
    #[serde(flatten)]
    pub medical_test: MedicalTest,
    /// `"<name> (<date>)"`
    pub display: String,
}

impl From<MedicalTest> for MedicalTestDetails {
    fn from(medical_test: MedicalTest) -> Self {
        let display = format!(
            "{} ({})",
            medical_test.name,
            format_date(&medical_test.date)
        );
        Self {
            medical_test,
            display,
        }
    }
}

// =============================================================================
// Appointment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub patient_complaints: Option<String>,
    pub anamnesis: Option<String>,
    pub examination_result: Option<String>,
    pub diagnosis: Option<String>,
    pub recommendations: Option<String>,
    pub patient_id: Uuid,
    pub service_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AppointmentInput {
    pub date: DateTime<Utc>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub patient_complaints: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub anamnesis: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub examination_result: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub diagnosis: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub recommendations: Option<String>,
    pub patient_id: Uuid,
    pub service_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
}

/// Appointment with the doctor who ran it, if still on record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor: Option<DoctorDetails>,
    /// `"Прием у <doctor> (<date>)"`
    pub display: String,
}

impl AppointmentDetails {
    pub fn new(appointment: Appointment, doctor: Option<DoctorDetails>) -> Self {
        let doctor_name = doctor
            .as_ref()
            .map(|d| d.display.as_str())
            .unwrap_or(MISSING_DOCTOR);
        let display = format!(
            "Прием у {} ({})",
            doctor_name,
            format_date(&appointment.date)
        );
        Self {
            appointment,
            doctor,
            display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            date: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
            patient_complaints: Some("Головная боль".to_string()),
            anamnesis: None,
            examination_result: None,
            diagnosis: None,
            recommendations: None,
            patient_id: Uuid::new_v4(),
            service_id: None,
            office_id: None,
            doctor_id: None,
        }
    }

    #[test]
    fn test_medical_test_display() {
        let test = MedicalTest {
            id: Uuid::new_v4(),
            date: Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap(),
            name: "Общий анализ крови".to_string(),
            result: "В норме".to_string(),
            patient_id: Uuid::new_v4(),
            service_id: None,
            office_id: None,
            doctor_id: None,
        };
        let details = MedicalTestDetails::from(test);
        assert_eq!(details.display, "Общий анализ крови (2024-01-15 08:00)");
    }

    #[test]
    fn test_appointment_display_without_doctor() {
        let details = AppointmentDetails::new(appointment(), None);
        assert_eq!(details.display, "Прием у — (2024-03-05 14:30)");
    }

    #[test]
    fn test_appointment_input_optional_refs() {
        let input: AppointmentInput = serde_json::from_value(serde_json::json!({
            "date": "2024-03-05T14:30:00Z",
            "patient_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert!(input.service_id.is_none());
        assert!(input.doctor_id.is_none());
        assert!(input.diagnosis.is_none());
    }
}
