//! Staff records: positions, employees, weekly schedules, specializations
//! and doctors.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validation::PHONE_RE;
use crate::errors::{AppError, AppResult};

/// Gender as recorded on staff and patient cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    #[serde(rename = "м")]
    Male,
    #[serde(rename = "ж")]
    Female,
    #[default]
    #[serde(rename = "н")]
    Unspecified,
}

impl Gender {
    /// Single-letter code stored in the database
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "м",
            Gender::Female => "ж",
            Gender::Unspecified => "н",
        }
    }

    /// Parse a stored code. Unknown codes read as `Unspecified`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "м" => Gender::Male,
            "ж" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Weekday {
    #[serde(rename = "пн")]
    Monday,
    #[serde(rename = "вт")]
    Tuesday,
    #[serde(rename = "ср")]
    Wednesday,
    #[serde(rename = "чт")]
    Thursday,
    #[serde(rename = "пт")]
    Friday,
    #[serde(rename = "сб")]
    Saturday,
    #[serde(rename = "вс")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Ordinal stored in the database (Monday = 0)
    pub fn ordinal(self) -> i16 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    pub fn from_ordinal(ordinal: i16) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Two-letter abbreviation
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Monday => "пн",
            Weekday::Tuesday => "вт",
            Weekday::Wednesday => "ср",
            Weekday::Thursday => "чт",
            Weekday::Friday => "пт",
            Weekday::Saturday => "сб",
            Weekday::Sunday => "вс",
        }
    }
}

// =============================================================================
// Position
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Position {
    pub id: Uuid,
    #[schema(example = "Терапевт")]
    pub name: String,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Payload for entities that carry only a name (positions, specializations)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NameInput {
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub name: String,
}

// =============================================================================
// Employee
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub record_book_id: Option<String>,
    pub passport_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub position_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EmployeeInput {
    pub account_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    #[schema(example = "Петрова Анна Сергеевна")]
    pub full_name: String,
    #[serde(default)]
    pub gender: Gender,
    #[validate(
        length(max = 15, message = "must be at most 15 characters"),
        regex(path = *PHONE_RE, message = "must contain digits only")
    )]
    pub phone_number: Option<String>,
    #[validate(length(max = 7, message = "must be at most 7 characters"))]
    pub record_book_id: Option<String>,
    #[validate(length(max = 11, message = "must be at most 11 characters"))]
    pub passport_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub position_id: Uuid,
}

/// Employee with the position it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EmployeeDetails {
    #[serde(flatten)]
    pub employee: Employee,
    pub position: Position,
    /// `"<position> <full name>"`
    pub display: String,
}

impl EmployeeDetails {
    pub fn new(employee: Employee, position: Position) -> Self {
        let display = format!("{} {}", position, employee.full_name);
        Self {
            employee,
            position,
            display,
        }
    }
}

impl std::fmt::Display for EmployeeDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

// =============================================================================
// Schedule
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Schedule {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub weekday: Weekday,
    #[schema(value_type = String, example = "09:00:00")]
    pub work_start_time: NaiveTime,
    #[schema(value_type = String, example = "17:00:00")]
    pub work_end_time: NaiveTime,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ScheduleInput {
    pub employee_id: Uuid,
    pub weekday: Weekday,
    #[schema(value_type = String, example = "09:00:00")]
    pub work_start_time: NaiveTime,
    #[schema(value_type = String, example = "17:00:00")]
    pub work_end_time: NaiveTime,
}

impl ScheduleInput {
    /// A shift must end after it starts.
    pub fn ensure_window(&self) -> AppResult<()> {
        if self.work_start_time < self.work_end_time {
            Ok(())
        } else {
            Err(AppError::invalid_field(
                "work_end_time",
                "must be later than work_start_time",
            ))
        }
    }
}

/// Schedule row with its employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScheduleDetails {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub employee: EmployeeDetails,
    /// `"<employee>, <weekday>: <start>-<end>"`
    pub display: String,
}

impl ScheduleDetails {
    pub fn new(schedule: Schedule, employee: EmployeeDetails) -> Self {
        let display = format!(
            "{}, {}: {}-{}",
            employee,
            schedule.weekday.code(),
            schedule.work_start_time.format("%H:%M:%S"),
            schedule.work_end_time.format("%H:%M:%S"),
        );
        Self {
            schedule,
            employee,
            display,
        }
    }
}

// =============================================================================
// Specialization & Doctor
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Specialization {
    pub id: Uuid,
    #[schema(example = "Кардиология")]
    pub name: String,
}

impl std::fmt::Display for Specialization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Doctor {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub specialization_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DoctorInput {
    pub employee_id: Uuid,
    pub specialization_id: Uuid,
}

/// Doctor with its employee card and specialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DoctorDetails {
    pub id: Uuid,
    pub employee: EmployeeDetails,
    pub specialization: Specialization,
    /// `"<employee> : <specialization>"`
    pub display: String,
}

impl DoctorDetails {
    pub fn new(doctor: &Doctor, employee: EmployeeDetails, specialization: Specialization) -> Self {
        let display = format!("{} : {}", employee, specialization);
        Self {
            id: doctor.id,
            employee,
            specialization,
            display,
        }
    }
}

impl std::fmt::Display for DoctorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}
