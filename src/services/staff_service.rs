//! Staff service - Positions, specializations, employees, schedules and doctors.
//!
//! Every payload reference is resolved before writing, and deletes of
//! RESTRICT targets count their dependents first.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    ensure_not_blank, validate_input, DoctorDetails, DoctorInput, EmployeeDetails, EmployeeInput,
    NameInput, Position, ScheduleDetails, ScheduleInput, Specialization,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::policy::{Action, Principal, Resource};
use crate::types::{Paginated, PaginationParams};

/// Staff service trait for dependency injection.
#[async_trait]
pub trait StaffService: Send + Sync {
    // Positions
    async fn list_positions(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<Position>>;
    async fn get_position(&self, principal: &Principal, id: Uuid) -> AppResult<Position>;
    async fn create_position(&self, principal: &Principal, input: NameInput)
        -> AppResult<Position>;
    async fn update_position(
        &self,
        principal: &Principal,
        id: Uuid,
        input: NameInput,
    ) -> AppResult<Position>;
    /// Refused while an employee holds the position
    async fn delete_position(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    // Specializations
    async fn list_specializations(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<Specialization>>;
    async fn get_specialization(&self, principal: &Principal, id: Uuid)
        -> AppResult<Specialization>;
    async fn create_specialization(
        &self,
        principal: &Principal,
        input: NameInput,
    ) -> AppResult<Specialization>;
    async fn update_specialization(
        &self,
        principal: &Principal,
        id: Uuid,
        input: NameInput,
    ) -> AppResult<Specialization>;
    /// Refused while a doctor has the specialization
    async fn delete_specialization(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    // Employees
    async fn list_employees(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<EmployeeDetails>>;
    async fn get_employee(&self, principal: &Principal, id: Uuid) -> AppResult<EmployeeDetails>;
    async fn create_employee(
        &self,
        principal: &Principal,
        input: EmployeeInput,
    ) -> AppResult<EmployeeDetails>;
    async fn update_employee(
        &self,
        principal: &Principal,
        id: Uuid,
        input: EmployeeInput,
    ) -> AppResult<EmployeeDetails>;
    /// Removes the employee's schedules and doctor record as well
    async fn delete_employee(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    // Schedules
    async fn list_schedules(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<ScheduleDetails>>;
    async fn get_schedule(&self, principal: &Principal, id: Uuid) -> AppResult<ScheduleDetails>;
    async fn create_schedule(
        &self,
        principal: &Principal,
        input: ScheduleInput,
    ) -> AppResult<ScheduleDetails>;
    async fn update_schedule(
        &self,
        principal: &Principal,
        id: Uuid,
        input: ScheduleInput,
    ) -> AppResult<ScheduleDetails>;
    async fn delete_schedule(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    // Doctors
    async fn list_doctors(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<DoctorDetails>>;
    async fn get_doctor(&self, principal: &Principal, id: Uuid) -> AppResult<DoctorDetails>;
    async fn create_doctor(
        &self,
        principal: &Principal,
        input: DoctorInput,
    ) -> AppResult<DoctorDetails>;
    async fn update_doctor(
        &self,
        principal: &Principal,
        id: Uuid,
        input: DoctorInput,
    ) -> AppResult<DoctorDetails>;
    async fn delete_doctor(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

/// Trimmed, non-empty name from a name-only payload.
fn clean_name(input: NameInput) -> AppResult<String> {
    validate_input(&input)?;
    ensure_not_blank("name", &input.name)?;
    Ok(input.name.trim().to_string())
}

/// Concrete implementation of StaffService using Unit of Work.
pub struct StaffManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StaffManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Resolve the account and position named by an employee payload, and
    /// make sure no other employee is linked to the account.
    async fn check_employee(&self, input: &EmployeeInput, current: Option<Uuid>) -> AppResult<()> {
        validate_input(input)?;
        ensure_not_blank("full_name", &input.full_name)?;
        self.uow
            .accounts()
            .find_by_id(input.account_id)
            .await?
            .ok_or_unknown("account_id")?;
        self.uow
            .staff()
            .find_position(input.position_id)
            .await?
            .ok_or_unknown("position_id")?;

        match self
            .uow
            .staff()
            .find_employee_by_account(input.account_id)
            .await?
        {
            Some(linked) if Some(linked.id) != current => Err(AppError::invalid_field(
                "account_id",
                "is already linked to another employee",
            )),
            _ => Ok(()),
        }
    }

    async fn check_schedule(&self, input: &ScheduleInput) -> AppResult<()> {
        validate_input(input)?;
        input.ensure_window()?;
        self.uow
            .staff()
            .find_employee(input.employee_id)
            .await?
            .ok_or_unknown("employee_id")?;
        Ok(())
    }

    /// Resolve the employee and specialization of a doctor payload; an
    /// employee can back at most one doctor.
    async fn check_doctor(&self, input: &DoctorInput, current: Option<Uuid>) -> AppResult<()> {
        self.uow
            .staff()
            .find_employee(input.employee_id)
            .await?
            .ok_or_unknown("employee_id")?;
        self.uow
            .staff()
            .find_specialization(input.specialization_id)
            .await?
            .ok_or_unknown("specialization_id")?;

        match self
            .uow
            .staff()
            .find_doctor_by_employee(input.employee_id)
            .await?
        {
            Some(doctor) if Some(doctor.id) != current => Err(AppError::invalid_field(
                "employee_id",
                "is already registered as a doctor",
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> StaffService for StaffManager<U> {
    // =========================================================================
    // Positions
    // =========================================================================

    async fn list_positions(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<Position>> {
        principal.authorize(Resource::Position, Action::List)?;
        let (data, total) = self.uow.staff().list_positions(&params).await?;
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get_position(&self, principal: &Principal, id: Uuid) -> AppResult<Position> {
        principal.authorize(Resource::Position, Action::View)?;
        self.uow.staff().find_position(id).await?.ok_or_not_found()
    }

    async fn create_position(
        &self,
        principal: &Principal,
        input: NameInput,
    ) -> AppResult<Position> {
        principal.authorize(Resource::Position, Action::Create)?;
        let position = self.uow.staff().create_position(clean_name(input)?).await?;
        tracing::info!(position_id = %position.id, "Position created");
        Ok(position)
    }

    async fn update_position(
        &self,
        principal: &Principal,
        id: Uuid,
        input: NameInput,
    ) -> AppResult<Position> {
        principal.authorize(Resource::Position, Action::Update)?;
        self.uow.staff().update_position(id, clean_name(input)?).await
    }

    async fn delete_position(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Position, Action::Delete)?;
        if self.uow.staff().count_employees_in_position(id).await? > 0 {
            return Err(AppError::still_referenced("Position"));
        }
        self.uow.staff().delete_position(id).await?;
        tracing::info!(position_id = %id, "Position deleted");
        Ok(())
    }

    // =========================================================================
    // Specializations
    // =========================================================================

    async fn list_specializations(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<Specialization>> {
        principal.authorize(Resource::Specialization, Action::List)?;
        let (data, total) = self.uow.staff().list_specializations(&params).await?;
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get_specialization(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> AppResult<Specialization> {
        principal.authorize(Resource::Specialization, Action::View)?;
        self.uow
            .staff()
            .find_specialization(id)
            .await?
            .ok_or_not_found()
    }

    async fn create_specialization(
        &self,
        principal: &Principal,
        input: NameInput,
    ) -> AppResult<Specialization> {
        principal.authorize(Resource::Specialization, Action::Create)?;
        let specialization = self
            .uow
            .staff()
            .create_specialization(clean_name(input)?)
            .await?;
        tracing::info!(specialization_id = %specialization.id, "Specialization created");
        Ok(specialization)
    }

    async fn update_specialization(
        &self,
        principal: &Principal,
        id: Uuid,
        input: NameInput,
    ) -> AppResult<Specialization> {
        principal.authorize(Resource::Specialization, Action::Update)?;
        self.uow
            .staff()
            .update_specialization(id, clean_name(input)?)
            .await
    }

    async fn delete_specialization(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Specialization, Action::Delete)?;
        if self.uow.staff().count_doctors_in_specialization(id).await? > 0 {
            return Err(AppError::still_referenced("Specialization"));
        }
        self.uow.staff().delete_specialization(id).await?;
        tracing::info!(specialization_id = %id, "Specialization deleted");
        Ok(())
    }

    // =========================================================================
    // Employees
    // =========================================================================

    async fn list_employees(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<EmployeeDetails>> {
        principal.authorize(Resource::Employee, Action::List)?;
        let (data, total) = self.uow.staff().list_employees(&params).await?;
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get_employee(&self, principal: &Principal, id: Uuid) -> AppResult<EmployeeDetails> {
        principal.authorize(Resource::Employee, Action::View)?;
        self.uow.staff().find_employee(id).await?.ok_or_not_found()
    }

    async fn create_employee(
        &self,
        principal: &Principal,
        input: EmployeeInput,
    ) -> AppResult<EmployeeDetails> {
        principal.authorize(Resource::Employee, Action::Create)?;
        self.check_employee(&input, None).await?;
        let employee = self.uow.staff().create_employee(input).await?;
        tracing::info!(employee_id = %employee.employee.id, "Employee created");
        Ok(employee)
    }

    async fn update_employee(
        &self,
        principal: &Principal,
        id: Uuid,
        input: EmployeeInput,
    ) -> AppResult<EmployeeDetails> {
        principal.authorize(Resource::Employee, Action::Update)?;
        self.check_employee(&input, Some(id)).await?;
        self.uow.staff().update_employee(id, input).await
    }

    async fn delete_employee(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Employee, Action::Delete)?;
        self.uow.staff().delete_employee(id).await?;
        tracing::info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    // =========================================================================
    // Schedules
    // =========================================================================

    async fn list_schedules(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<ScheduleDetails>> {
        principal.authorize(Resource::Schedule, Action::List)?;
        let (data, total) = self.uow.staff().list_schedules(&params).await?;
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get_schedule(&self, principal: &Principal, id: Uuid) -> AppResult<ScheduleDetails> {
        principal.authorize(Resource::Schedule, Action::View)?;
        self.uow.staff().find_schedule(id).await?.ok_or_not_found()
    }

    async fn create_schedule(
        &self,
        principal: &Principal,
        input: ScheduleInput,
    ) -> AppResult<ScheduleDetails> {
        principal.authorize(Resource::Schedule, Action::Create)?;
        self.check_schedule(&input).await?;
        self.uow.staff().create_schedule(input).await
    }

    async fn update_schedule(
        &self,
        principal: &Principal,
        id: Uuid,
        input: ScheduleInput,
    ) -> AppResult<ScheduleDetails> {
        principal.authorize(Resource::Schedule, Action::Update)?;
        self.check_schedule(&input).await?;
        self.uow.staff().update_schedule(id, input).await
    }

    async fn delete_schedule(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Schedule, Action::Delete)?;
        self.uow.staff().delete_schedule(id).await
    }

    // =========================================================================
    // Doctors
    // =========================================================================

    async fn list_doctors(
        &self,
        principal: &Principal,
        params: PaginationParams,
    ) -> AppResult<Paginated<DoctorDetails>> {
        principal.authorize(Resource::Doctor, Action::List)?;
        let (data, total) = self.uow.staff().list_doctors(&params).await?;
        Ok(Paginated::from_page(data, &params, total))
    }

    async fn get_doctor(&self, principal: &Principal, id: Uuid) -> AppResult<DoctorDetails> {
        principal.authorize(Resource::Doctor, Action::View)?;
        self.uow.staff().find_doctor(id).await?.ok_or_not_found()
    }

    async fn create_doctor(
        &self,
        principal: &Principal,
        input: DoctorInput,
    ) -> AppResult<DoctorDetails> {
        principal.authorize(Resource::Doctor, Action::Create)?;
        self.check_doctor(&input, None).await?;
        let doctor = self.uow.staff().create_doctor(input).await?;
        tracing::info!(doctor_id = %doctor.id, "Doctor created");
        Ok(doctor)
    }

    async fn update_doctor(
        &self,
        principal: &Principal,
        id: Uuid,
        input: DoctorInput,
    ) -> AppResult<DoctorDetails> {
        principal.authorize(Resource::Doctor, Action::Update)?;
        self.check_doctor(&input, Some(id)).await?;
        self.uow.staff().update_doctor(id, input).await
    }

    async fn delete_doctor(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.authorize(Resource::Doctor, Action::Delete)?;
        self.uow.staff().delete_doctor(id).await?;
        tracing::info!(doctor_id = %id, "Doctor deleted");
        Ok(())
    }
}
