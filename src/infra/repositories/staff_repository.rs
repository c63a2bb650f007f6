//! Staff repository: positions, specializations, employees, their weekly
//! schedules and doctors.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    JoinType, LoaderTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use super::base;
use super::entities::{doctor, employee, position, schedule, specialization};
use crate::domain::{
    Doctor, DoctorDetails, DoctorInput, Employee, EmployeeDetails, EmployeeInput, Position,
    Schedule, ScheduleDetails, ScheduleInput, Specialization,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Staff repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    // Positions
    async fn list_positions(&self, params: &PaginationParams) -> AppResult<(Vec<Position>, u64)>;
    async fn find_position(&self, id: Uuid) -> AppResult<Option<Position>>;
    async fn create_position(&self, name: String) -> AppResult<Position>;
    async fn update_position(&self, id: Uuid, name: String) -> AppResult<Position>;
    async fn delete_position(&self, id: Uuid) -> AppResult<()>;
    /// Employees holding the position
    async fn count_employees_in_position(&self, id: Uuid) -> AppResult<u64>;

    // Specializations
    async fn list_specializations(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Specialization>, u64)>;
    async fn find_specialization(&self, id: Uuid) -> AppResult<Option<Specialization>>;
    async fn create_specialization(&self, name: String) -> AppResult<Specialization>;
    async fn update_specialization(&self, id: Uuid, name: String) -> AppResult<Specialization>;
    async fn delete_specialization(&self, id: Uuid) -> AppResult<()>;
    /// Doctors with the specialization
    async fn count_doctors_in_specialization(&self, id: Uuid) -> AppResult<u64>;

    // Employees
    async fn list_employees(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<EmployeeDetails>, u64)>;
    async fn find_employee(&self, id: Uuid) -> AppResult<Option<EmployeeDetails>>;
    /// Employee card linked to an account, if any
    async fn find_employee_by_account(&self, account_id: Uuid) -> AppResult<Option<Employee>>;
    async fn create_employee(&self, input: EmployeeInput) -> AppResult<EmployeeDetails>;
    async fn update_employee(&self, id: Uuid, input: EmployeeInput) -> AppResult<EmployeeDetails>;
    async fn delete_employee(&self, id: Uuid) -> AppResult<()>;

    // Schedules
    async fn list_schedules(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<ScheduleDetails>, u64)>;
    async fn find_schedule(&self, id: Uuid) -> AppResult<Option<ScheduleDetails>>;
    async fn create_schedule(&self, input: ScheduleInput) -> AppResult<ScheduleDetails>;
    async fn update_schedule(&self, id: Uuid, input: ScheduleInput) -> AppResult<ScheduleDetails>;
    async fn delete_schedule(&self, id: Uuid) -> AppResult<()>;

    // Doctors
    async fn list_doctors(&self, params: &PaginationParams) -> AppResult<(Vec<DoctorDetails>, u64)>;
    async fn find_doctor(&self, id: Uuid) -> AppResult<Option<DoctorDetails>>;
    /// Doctors with the given ids; unknown ids are skipped
    async fn find_doctors(&self, ids: Vec<Uuid>) -> AppResult<Vec<DoctorDetails>>;
    /// Doctor record of an employee, if any
    async fn find_doctor_by_employee(&self, employee_id: Uuid) -> AppResult<Option<Doctor>>;
    async fn create_doctor(&self, input: DoctorInput) -> AppResult<DoctorDetails>;
    async fn update_doctor(&self, id: Uuid, input: DoctorInput) -> AppResult<DoctorDetails>;
    async fn delete_doctor(&self, id: Uuid) -> AppResult<()>;
    async fn count_doctors(&self) -> AppResult<u64>;
}

/// Concrete implementation of StaffRepository
pub struct StaffStore {
    db: DatabaseConnection,
}

impl StaffStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StaffRepository for StaffStore {
    // =========================================================================
    // Positions
    // =========================================================================

    async fn list_positions(&self, params: &PaginationParams) -> AppResult<(Vec<Position>, u64)> {
        let (models, total) = base::fetch_page(
            position::Entity::find().order_by_asc(position::Column::Name),
            &self.db,
            params,
        )
        .await?;
        Ok((models.into_iter().map(Position::from).collect(), total))
    }

    async fn find_position(&self, id: Uuid) -> AppResult<Option<Position>> {
        let model = position::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Position::from))
    }

    async fn create_position(&self, name: String) -> AppResult<Position> {
        let model = position::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
        }
        .insert(&self.db)
        .await?;
        Ok(Position::from(model))
    }

    async fn update_position(&self, id: Uuid, name: String) -> AppResult<Position> {
        let model = position::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: position::ActiveModel = model.into();
        active.name = Set(name);
        let model = active.update(&self.db).await?;
        Ok(Position::from(model))
    }

    async fn delete_position(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<position::Entity, _>(id, &self.db).await
    }

    async fn count_employees_in_position(&self, id: Uuid) -> AppResult<u64> {
        base::count(
            employee::Entity::find().filter(employee::Column::PositionId.eq(id)),
            &self.db,
        )
        .await
    }

    // =========================================================================
    // Specializations
    // =========================================================================

    async fn list_specializations(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Specialization>, u64)> {
        let (models, total) = base::fetch_page(
            specialization::Entity::find().order_by_asc(specialization::Column::Name),
            &self.db,
            params,
        )
        .await?;
        Ok((models.into_iter().map(Specialization::from).collect(), total))
    }

    async fn find_specialization(&self, id: Uuid) -> AppResult<Option<Specialization>> {
        let model = specialization::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Specialization::from))
    }

    async fn create_specialization(&self, name: String) -> AppResult<Specialization> {
        let model = specialization::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
        }
        .insert(&self.db)
        .await?;
        Ok(Specialization::from(model))
    }

    async fn update_specialization(&self, id: Uuid, name: String) -> AppResult<Specialization> {
        let model = specialization::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: specialization::ActiveModel = model.into();
        active.name = Set(name);
        let model = active.update(&self.db).await?;
        Ok(Specialization::from(model))
    }

    async fn delete_specialization(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<specialization::Entity, _>(id, &self.db).await
    }

    async fn count_doctors_in_specialization(&self, id: Uuid) -> AppResult<u64> {
        base::count(
            doctor::Entity::find().filter(doctor::Column::SpecializationId.eq(id)),
            &self.db,
        )
        .await
    }

    // =========================================================================
    // Employees
    // =========================================================================

    async fn list_employees(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<EmployeeDetails>, u64)> {
        let (models, total) = base::fetch_page(
            employee::Entity::find().order_by_asc(employee::Column::FullName),
            &self.db,
            params,
        )
        .await?;
        Ok((employee_details(&self.db, models).await?, total))
    }

    async fn find_employee(&self, id: Uuid) -> AppResult<Option<EmployeeDetails>> {
        let models: Vec<_> = employee::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .into_iter()
            .collect();
        Ok(employee_details(&self.db, models).await?.pop())
    }

    async fn find_employee_by_account(&self, account_id: Uuid) -> AppResult<Option<Employee>> {
        let model = employee::Entity::find()
            .filter(employee::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Employee::from))
    }

    async fn create_employee(&self, input: EmployeeInput) -> AppResult<EmployeeDetails> {
        let mut active = employee_fields(input);
        active.id = Set(Uuid::new_v4());
        let model = active.insert(&self.db).await?;
        base::single(employee_details(&self.db, vec![model]).await?)
    }

    async fn update_employee(&self, id: Uuid, input: EmployeeInput) -> AppResult<EmployeeDetails> {
        let model = employee::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active = employee_fields(input);
        active.id = ActiveValue::Unchanged(model.id);
        let model = active.update(&self.db).await?;
        base::single(employee_details(&self.db, vec![model]).await?)
    }

    async fn delete_employee(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<employee::Entity, _>(id, &self.db).await
    }

    // =========================================================================
    // Schedules
    // =========================================================================

    async fn list_schedules(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<ScheduleDetails>, u64)> {
        let select = schedule::Entity::find()
            .join(JoinType::InnerJoin, schedule::Relation::Employee.def())
            .order_by_asc(employee::Column::FullName)
            .order_by_asc(schedule::Column::EmployeeId)
            .order_by_asc(schedule::Column::Weekday)
            .order_by_asc(schedule::Column::WorkStartTime);
        let (models, total) = base::fetch_page(select, &self.db, params).await?;
        Ok((schedule_details(&self.db, models).await?, total))
    }

    async fn find_schedule(&self, id: Uuid) -> AppResult<Option<ScheduleDetails>> {
        let models: Vec<_> = schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .into_iter()
            .collect();
        Ok(schedule_details(&self.db, models).await?.pop())
    }

    async fn create_schedule(&self, input: ScheduleInput) -> AppResult<ScheduleDetails> {
        let model = schedule::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id),
            weekday: Set(input.weekday.ordinal()),
            work_start_time: Set(input.work_start_time),
            work_end_time: Set(input.work_end_time),
        }
        .insert(&self.db)
        .await?;
        base::single(schedule_details(&self.db, vec![model]).await?)
    }

    async fn update_schedule(&self, id: Uuid, input: ScheduleInput) -> AppResult<ScheduleDetails> {
        let model = schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: schedule::ActiveModel = model.into();
        active.employee_id = Set(input.employee_id);
        active.weekday = Set(input.weekday.ordinal());
        active.work_start_time = Set(input.work_start_time);
        active.work_end_time = Set(input.work_end_time);
        let model = active.update(&self.db).await?;
        base::single(schedule_details(&self.db, vec![model]).await?)
    }

    async fn delete_schedule(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<schedule::Entity, _>(id, &self.db).await
    }

    // =========================================================================
    // Doctors
    // =========================================================================

    async fn list_doctors(&self, params: &PaginationParams) -> AppResult<(Vec<DoctorDetails>, u64)> {
        let (models, total) = base::fetch_page(ordered_doctors(), &self.db, params).await?;
        Ok((doctor_details(&self.db, models).await?, total))
    }

    async fn find_doctor(&self, id: Uuid) -> AppResult<Option<DoctorDetails>> {
        Ok(find_doctors(&self.db, vec![id]).await?.pop())
    }

    async fn find_doctors(&self, ids: Vec<Uuid>) -> AppResult<Vec<DoctorDetails>> {
        find_doctors(&self.db, ids).await
    }

    async fn find_doctor_by_employee(&self, employee_id: Uuid) -> AppResult<Option<Doctor>> {
        let model = doctor::Entity::find()
            .filter(doctor::Column::EmployeeId.eq(employee_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Doctor::from))
    }

    async fn create_doctor(&self, input: DoctorInput) -> AppResult<DoctorDetails> {
        let model = doctor::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id),
            specialization_id: Set(input.specialization_id),
        }
        .insert(&self.db)
        .await?;
        base::single(doctor_details(&self.db, vec![model]).await?)
    }

    async fn update_doctor(&self, id: Uuid, input: DoctorInput) -> AppResult<DoctorDetails> {
        let model = doctor::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: doctor::ActiveModel = model.into();
        active.employee_id = Set(input.employee_id);
        active.specialization_id = Set(input.specialization_id);
        let model = active.update(&self.db).await?;
        base::single(doctor_details(&self.db, vec![model]).await?)
    }

    async fn delete_doctor(&self, id: Uuid) -> AppResult<()> {
        base::delete_by_id::<doctor::Entity, _>(id, &self.db).await
    }

    async fn count_doctors(&self) -> AppResult<u64> {
        base::count(doctor::Entity::find(), &self.db).await
    }
}

/// Doctors ordered by their employee's full name.
pub(crate) fn ordered_doctors() -> Select<doctor::Entity> {
    doctor::Entity::find()
        .join(JoinType::InnerJoin, doctor::Relation::Employee.def())
        .order_by_asc(employee::Column::FullName)
        .order_by_asc(doctor::Column::Id)
}

/// Load doctors by id with their employee cards and specializations.
///
/// Result order follows [`ordered_doctors`]; unknown ids are skipped.
pub(crate) async fn find_doctors<C: ConnectionTrait>(
    db: &C,
    ids: Vec<Uuid>,
) -> AppResult<Vec<DoctorDetails>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let models = ordered_doctors()
        .filter(doctor::Column::Id.is_in(ids))
        .all(db)
        .await?;
    doctor_details(db, models).await
}

pub(crate) async fn doctor_details<C: ConnectionTrait>(
    db: &C,
    models: Vec<doctor::Model>,
) -> AppResult<Vec<DoctorDetails>> {
    let employees = models.load_one(employee::Entity, db).await?;
    let specializations = models.load_one(specialization::Entity, db).await?;

    let employees = employees
        .into_iter()
        .map(|e| e.ok_or_else(|| AppError::internal("doctor without employee")))
        .collect::<AppResult<Vec<_>>>()?;
    let employees = employee_details(db, employees).await?;

    models
        .iter()
        .zip(employees)
        .zip(specializations)
        .map(|((model, employee), specialization)| {
            let specialization = specialization
                .ok_or_else(|| AppError::internal("doctor without specialization"))?;
            Ok(DoctorDetails::new(
                &Doctor::from(model.clone()),
                employee,
                Specialization::from(specialization),
            ))
        })
        .collect()
}

async fn employee_details<C: ConnectionTrait>(
    db: &C,
    models: Vec<employee::Model>,
) -> AppResult<Vec<EmployeeDetails>> {
    let positions = models.load_one(position::Entity, db).await?;
    models
        .into_iter()
        .zip(positions)
        .map(|(model, position)| {
            let position = position.ok_or_else(|| AppError::internal("employee without position"))?;
            Ok(EmployeeDetails::new(
                Employee::from(model),
                Position::from(position),
            ))
        })
        .collect()
}

async fn schedule_details<C: ConnectionTrait>(
    db: &C,
    models: Vec<schedule::Model>,
) -> AppResult<Vec<ScheduleDetails>> {
    let employees = models.load_one(employee::Entity, db).await?;
    let employees = employees
        .into_iter()
        .map(|e| e.ok_or_else(|| AppError::internal("schedule without employee")))
        .collect::<AppResult<Vec<_>>>()?;
    let employees = employee_details(db, employees).await?;

    models
        .into_iter()
        .zip(employees)
        .map(|(model, employee)| Ok(ScheduleDetails::new(Schedule::try_from(model)?, employee)))
        .collect()
}

fn employee_fields(input: EmployeeInput) -> employee::ActiveModel {
    employee::ActiveModel {
        id: ActiveValue::NotSet,
        account_id: Set(input.account_id),
        full_name: Set(input.full_name),
        gender: Set(input.gender.code().to_string()),
        phone_number: Set(input.phone_number),
        record_book_id: Set(input.record_book_id),
        passport_id: Set(input.passport_id),
        birth_date: Set(input.birth_date),
        position_id: Set(input.position_id),
    }
}
