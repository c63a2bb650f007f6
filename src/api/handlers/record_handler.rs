//! Appointment and medical test handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::domain::{AppointmentDetails, AppointmentInput, MedicalTestDetails, MedicalTestInput};
use crate::errors::AppResult;
use crate::policy::{Action, Principal, Resource};
use crate::types::NoContent;

pub fn appointment_routes() -> Router<AppState> {
    Router::new().route("/", post(create_appointment)).route(
        "/:id",
        get(get_appointment)
            .put(update_appointment)
            .delete(delete_appointment),
    )
}

pub fn medical_test_routes() -> Router<AppState> {
    Router::new().route("/", post(create_medical_test)).route(
        "/:id",
        get(get_medical_test)
            .put(update_medical_test)
            .delete(delete_medical_test),
    )
}

// =============================================================================
// Appointments
// =============================================================================

#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "Records",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentDetails),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_appointment(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AppointmentDetails>> {
    Ok(Json(state.record_service.get_appointment(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/appointments",
    tag = "Records",
    security(("bearer_auth" = [])),
    request_body = AppointmentInput,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentDetails),
        (status = 400, description = "Validation error or unknown reference"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_appointment(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<AppointmentInput>,
) -> AppResult<(StatusCode, Json<AppointmentDetails>)> {
    let payload = body.authorized(&principal, Resource::Appointment, Action::Create)?;
    let appointment = state
        .record_service
        .create_appointment(&principal, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[utoipa::path(
    put,
    path = "/appointments/{id}",
    tag = "Records",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = AppointmentInput,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentDetails),
        (status = 400, description = "Validation error or unknown reference"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn update_appointment(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<AppointmentInput>,
) -> AppResult<Json<AppointmentDetails>> {
    let payload = body.authorized(&principal, Resource::Appointment, Action::Update)?;
    Ok(Json(
        state
            .record_service
            .update_appointment(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "Records",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn delete_appointment(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.record_service.delete_appointment(&principal, id).await?;
    Ok(NoContent)
}

// =============================================================================
// Medical tests
// =============================================================================

#[utoipa::path(
    get,
    path = "/medical-tests/{id}",
    tag = "Records",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Medical test ID")),
    responses(
        (status = 200, description = "Medical test", body = MedicalTestDetails),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Medical test not found")
    )
)]
pub async fn get_medical_test(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MedicalTestDetails>> {
    Ok(Json(state.record_service.get_medical_test(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/medical-tests",
    tag = "Records",
    security(("bearer_auth" = [])),
    request_body = MedicalTestInput,
    responses(
        (status = 201, description = "Medical test created", body = MedicalTestDetails),
        (status = 400, description = "Validation error or unknown reference"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_medical_test(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<MedicalTestInput>,
) -> AppResult<(StatusCode, Json<MedicalTestDetails>)> {
    let payload = body.authorized(&principal, Resource::MedicalTest, Action::Create)?;
    let test = state
        .record_service
        .create_medical_test(&principal, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(test)))
}

#[utoipa::path(
    put,
    path = "/medical-tests/{id}",
    tag = "Records",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Medical test ID")),
    request_body = MedicalTestInput,
    responses(
        (status = 200, description = "Medical test updated", body = MedicalTestDetails),
        (status = 400, description = "Validation error or unknown reference"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Medical test not found")
    )
)]
pub async fn update_medical_test(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<MedicalTestInput>,
) -> AppResult<Json<MedicalTestDetails>> {
    let payload = body.authorized(&principal, Resource::MedicalTest, Action::Update)?;
    Ok(Json(
        state
            .record_service
            .update_medical_test(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/medical-tests/{id}",
    tag = "Records",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Medical test ID")),
    responses(
        (status = 204, description = "Medical test deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Medical test not found")
    )
)]
pub async fn delete_medical_test(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.record_service.delete_medical_test(&principal, id).await?;
    Ok(NoContent)
}
