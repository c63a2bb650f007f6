//! Patient card handlers.

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
use crate::domain::{Patient, PatientInput, PatientRecord};
use crate::errors::AppResult;
use crate::policy::{Action, Principal, Resource};
use crate::types::{NoContent, Paginated, PaginationParams, PatientPage};

/// Create patient routes
pub fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route("/me", get(my_record))
        .route(
            "/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/:id/record", get(patient_record))
}

#[utoipa::path(
    get,
    path = "/patients",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Patients ordered by full name", body = PatientPage),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_patients(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Patient>>> {
    Ok(Json(state.patient_service.list(&principal, params).await?))
}

/// Get a patient card
///
/// Patients may only open their own card.
#[utoipa::path(
    get,
    path = "/patients/{id}",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient card", body = Patient),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn get_patient(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Patient>> {
    Ok(Json(state.patient_service.get(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/patients",
    tag = "Patients",
    security(("bearer_auth" = [])),
    request_body = PatientInput,
    responses(
        (status = 201, description = "Patient card created", body = Patient),
        (status = 400, description = "Validation error or account already linked"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_patient(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<PatientInput>,
) -> AppResult<(StatusCode, Json<Patient>)> {
    let payload = body.authorized(&principal, Resource::Patient, Action::Create)?;
    let patient = state.patient_service.create(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient ID")),
    request_body = PatientInput,
    responses(
        (status = 200, description = "Patient card updated", body = Patient),
        (status = 400, description = "Validation error or account already linked"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn update_patient(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<PatientInput>,
) -> AppResult<Json<Patient>> {
    let payload = body.authorized(&principal, Resource::Patient, Action::Update)?;
    Ok(Json(state.patient_service.update(&principal, id, payload).await?))
}

/// Delete a patient card together with its appointments and medical tests
#[utoipa::path(
    delete,
    path = "/patients/{id}",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn delete_patient(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.patient_service.delete(&principal, id).await?;
    Ok(NoContent)
}

/// Card, appointments and medical tests of the signed-in patient
#[utoipa::path(
    get,
    path = "/patients/me",
    tag = "Patients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own patient record", body = PatientRecord),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No patient card for this account")
    )
)]
pub async fn my_record(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
) -> AppResult<Json<PatientRecord>> {
    Ok(Json(state.patient_service.me(&principal).await?))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/record",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient card with appointments and medical tests", body = PatientRecord),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn patient_record(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PatientRecord>> {
    Ok(Json(state.patient_service.record(&principal, id).await?))
}
