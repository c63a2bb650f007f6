//! Staff handlers: positions, specializations, employees, schedules and doctors.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::domain::{
    DoctorDetails, DoctorInput, EmployeeDetails, EmployeeInput, NameInput, Position,
    ScheduleDetails, ScheduleInput, Specialization,
};
use crate::errors::AppResult;
use crate::policy::{Action, Principal, Resource};
use crate::types::{
    DoctorPage, EmployeePage, NoContent, Paginated, PaginationParams, PositionPage, SchedulePage,
    SpecializationPage,
};

pub fn position_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_positions).post(create_position))
        .route(
            "/:id",
            get(get_position).put(update_position).delete(delete_position),
        )
}

pub fn specialization_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_specializations).post(create_specialization))
        .route(
            "/:id",
            get(get_specialization)
                .put(update_specialization)
                .delete(delete_specialization),
        )
}

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route(
            "/:id",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
}

/// Doctor listing and detail are public
pub fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_doctors).post(create_doctor))
        .route(
            "/:id",
            get(get_doctor).put(update_doctor).delete(delete_doctor),
        )
}

// =============================================================================
// Positions
// =============================================================================

#[utoipa::path(
    get,
    path = "/positions",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Positions ordered by name", body = PositionPage),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_positions(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Position>>> {
    Ok(Json(state.staff_service.list_positions(&principal, params).await?))
}

#[utoipa::path(
    get,
    path = "/positions/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position", body = Position),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Position not found")
    )
)]
pub async fn get_position(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Position>> {
    Ok(Json(state.staff_service.get_position(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/positions",
    tag = "Staff",
    security(("bearer_auth" = [])),
    request_body = NameInput,
    responses(
        (status = 201, description = "Position created", body = Position),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_position(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<NameInput>,
) -> AppResult<(StatusCode, Json<Position>)> {
    let payload = body.authorized(&principal, Resource::Position, Action::Create)?;
    let position = state.staff_service.create_position(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(position)))
}

#[utoipa::path(
    put,
    path = "/positions/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Position ID")),
    request_body = NameInput,
    responses(
        (status = 200, description = "Position updated", body = Position),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Position not found")
    )
)]
pub async fn update_position(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<NameInput>,
) -> AppResult<Json<Position>> {
    let payload = body.authorized(&principal, Resource::Position, Action::Update)?;
    Ok(Json(
        state
            .staff_service
            .update_position(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/positions/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Position ID")),
    responses(
        (status = 204, description = "Position deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Position not found"),
        (status = 409, description = "Position still held by an employee")
    )
)]
pub async fn delete_position(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.staff_service.delete_position(&principal, id).await?;
    Ok(NoContent)
}

// =============================================================================
// Specializations
// =============================================================================

#[utoipa::path(
    get,
    path = "/specializations",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Specializations ordered by name", body = SpecializationPage),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_specializations(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Specialization>>> {
    Ok(Json(
        state
            .staff_service
            .list_specializations(&principal, params)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/specializations/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Specialization ID")),
    responses(
        (status = 200, description = "Specialization", body = Specialization),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Specialization not found")
    )
)]
pub async fn get_specialization(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Specialization>> {
    Ok(Json(
        state.staff_service.get_specialization(&principal, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/specializations",
    tag = "Staff",
    security(("bearer_auth" = [])),
    request_body = NameInput,
    responses(
        (status = 201, description = "Specialization created", body = Specialization),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_specialization(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<NameInput>,
) -> AppResult<(StatusCode, Json<Specialization>)> {
    let payload = body.authorized(&principal, Resource::Specialization, Action::Create)?;
    let specialization = state
        .staff_service
        .create_specialization(&principal, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(specialization)))
}

#[utoipa::path(
    put,
    path = "/specializations/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Specialization ID")),
    request_body = NameInput,
    responses(
        (status = 200, description = "Specialization updated", body = Specialization),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Specialization not found")
    )
)]
pub async fn update_specialization(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<NameInput>,
) -> AppResult<Json<Specialization>> {
    let payload = body.authorized(&principal, Resource::Specialization, Action::Update)?;
    Ok(Json(
        state
            .staff_service
            .update_specialization(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/specializations/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Specialization ID")),
    responses(
        (status = 204, description = "Specialization deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Specialization not found"),
        (status = 409, description = "Specialization still held by a doctor")
    )
)]
pub async fn delete_specialization(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .staff_service
        .delete_specialization(&principal, id)
        .await?;
    Ok(NoContent)
}

// =============================================================================
// Employees
// =============================================================================

#[utoipa::path(
    get,
    path = "/employees",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Employees ordered by full name", body = EmployeePage),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_employees(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<EmployeeDetails>>> {
    Ok(Json(state.staff_service.list_employees(&principal, params).await?))
}

#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee with position", body = EmployeeDetails),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EmployeeDetails>> {
    Ok(Json(state.staff_service.get_employee(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/employees",
    tag = "Staff",
    security(("bearer_auth" = [])),
    request_body = EmployeeInput,
    responses(
        (status = 201, description = "Employee created", body = EmployeeDetails),
        (status = 400, description = "Validation error or unknown account/position"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_employee(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<EmployeeInput>,
) -> AppResult<(StatusCode, Json<EmployeeDetails>)> {
    let payload = body.authorized(&principal, Resource::Employee, Action::Create)?;
    let employee = state.staff_service.create_employee(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeDetails),
        (status = 400, description = "Validation error or unknown account/position"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn update_employee(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<EmployeeInput>,
) -> AppResult<Json<EmployeeDetails>> {
    let payload = body.authorized(&principal, Resource::Employee, Action::Update)?;
    Ok(Json(
        state
            .staff_service
            .update_employee(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted with schedules and doctor record"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn delete_employee(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.staff_service.delete_employee(&principal, id).await?;
    Ok(NoContent)
}

// =============================================================================
// Schedules
// =============================================================================

#[utoipa::path(
    get,
    path = "/schedules",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Schedules ordered by employee and weekday", body = SchedulePage),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_schedules(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ScheduleDetails>>> {
    Ok(Json(state.staff_service.list_schedules(&principal, params).await?))
}

#[utoipa::path(
    get,
    path = "/schedules/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule with employee", body = ScheduleDetails),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn get_schedule(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ScheduleDetails>> {
    Ok(Json(state.staff_service.get_schedule(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/schedules",
    tag = "Staff",
    security(("bearer_auth" = [])),
    request_body = ScheduleInput,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleDetails),
        (status = 400, description = "Validation error, unknown employee or end not after start"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_schedule(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<ScheduleInput>,
) -> AppResult<(StatusCode, Json<ScheduleDetails>)> {
    let payload = body.authorized(&principal, Resource::Schedule, Action::Create)?;
    let schedule = state.staff_service.create_schedule(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    put,
    path = "/schedules/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Schedule ID")),
    request_body = ScheduleInput,
    responses(
        (status = 200, description = "Schedule updated", body = ScheduleDetails),
        (status = 400, description = "Validation error, unknown employee or end not after start"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn update_schedule(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<ScheduleInput>,
) -> AppResult<Json<ScheduleDetails>> {
    let payload = body.authorized(&principal, Resource::Schedule, Action::Update)?;
    Ok(Json(
        state
            .staff_service
            .update_schedule(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn delete_schedule(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.staff_service.delete_schedule(&principal, id).await?;
    Ok(NoContent)
}

// =============================================================================
// Doctors
// =============================================================================

#[utoipa::path(
    get,
    path = "/doctors",
    tag = "Staff",
    params(PaginationParams),
    responses(
        (status = 200, description = "Doctors ordered by employee name", body = DoctorPage)
    )
)]
pub async fn list_doctors(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<DoctorDetails>>> {
    Ok(Json(state.staff_service.list_doctors(&principal, params).await?))
}

#[utoipa::path(
    get,
    path = "/doctors/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "Doctor ID")),
    responses(
        (status = 200, description = "Doctor with employee and specialization", body = DoctorDetails),
        (status = 404, description = "Doctor not found")
    )
)]
pub async fn get_doctor(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DoctorDetails>> {
    Ok(Json(state.staff_service.get_doctor(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/doctors",
    tag = "Staff",
    security(("bearer_auth" = [])),
    request_body = DoctorInput,
    responses(
        (status = 201, description = "Doctor created", body = DoctorDetails),
        (status = 400, description = "Unknown employee or specialization, or employee already a doctor"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_doctor(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<DoctorInput>,
) -> AppResult<(StatusCode, Json<DoctorDetails>)> {
    let payload = body.authorized(&principal, Resource::Doctor, Action::Create)?;
    let doctor = state.staff_service.create_doctor(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

#[utoipa::path(
    put,
    path = "/doctors/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Doctor ID")),
    request_body = DoctorInput,
    responses(
        (status = 200, description = "Doctor updated", body = DoctorDetails),
        (status = 400, description = "Unknown employee or specialization, or employee already a doctor"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Doctor not found")
    )
)]
pub async fn update_doctor(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<DoctorInput>,
) -> AppResult<Json<DoctorDetails>> {
    let payload = body.authorized(&principal, Resource::Doctor, Action::Update)?;
    Ok(Json(
        state
            .staff_service
            .update_doctor(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/doctors/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Doctor ID")),
    responses(
        (status = 204, description = "Doctor deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Doctor not found")
    )
)]
pub async fn delete_doctor(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.staff_service.delete_doctor(&principal, id).await?;
    Ok(NoContent)
}
