//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};
use crate::domain::{
    AccountResponse, DoctorDetails, EmployeeDetails, Office, Patient, Position, ScheduleDetails,
    ServiceDetails, Specialization,
};

/// Pagination query parameters shared by every list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (max 100)
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Zero-based page index for the paginator
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset of the requested page. Pages whose offset does not fit a
    /// signed 64-bit SQL `OFFSET` are rejected.
    pub fn offset(&self) -> AppResult<u64> {
        self.page_index()
            .checked_mul(self.limit())
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::invalid_field("page", "is out of range"))
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    AccountPage = Paginated<AccountResponse>,
    PositionPage = Paginated<Position>,
    SpecializationPage = Paginated<Specialization>,
    EmployeePage = Paginated<EmployeeDetails>,
    SchedulePage = Paginated<ScheduleDetails>,
    DoctorPage = Paginated<DoctorDetails>,
    OfficePage = Paginated<Office>,
    ServicePage = Paginated<ServiceDetails>,
    PatientPage = Paginated<Patient>
)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Build a page from fetched rows and the total row count
    pub fn from_page(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        Self::new(data, params.page.max(1), params.limit(), total)
    }

    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PaginationParams::default());
        assert_eq!(params.limit(), 10);
        assert_eq!(params.page_index(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let huge = PaginationParams {
            page: 1,
            per_page: 10_000,
        };
        assert_eq!(huge.limit(), MAX_PAGE_SIZE);
        let zero = PaginationParams {
            page: 0,
            per_page: 0,
        };
        assert_eq!(zero.limit(), 1);
        assert_eq!(zero.page_index(), 0);
    }

    #[test]
    fn test_offset_of_later_page() {
        let params = PaginationParams {
            page: 3,
            per_page: 20,
        };
        assert_eq!(params.offset().unwrap(), 40);
    }

    #[test]
    fn test_offset_out_of_range_is_rejected() {
        let overflowing = PaginationParams {
            page: u64::MAX,
            per_page: 10,
        };
        assert!(matches!(overflowing.offset(), Err(AppError::Validation(_))));

        // Fits u64 but not a signed SQL offset
        let too_far = PaginationParams {
            page: u64::MAX / 100,
            per_page: 100,
        };
        assert!(too_far.offset().is_err());

        let last = PaginationParams {
            page: i64::MAX as u64 / 100,
            per_page: 100,
        };
        assert!(last.offset().is_ok());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Paginated::from_page(vec![1, 2, 3], &PaginationParams::default(), 21);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.per_page, 10);
        assert_eq!(page.meta.page, 1);
    }
}
