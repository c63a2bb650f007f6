//! Office and service catalog handlers, plus the public overview.

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
use crate::domain::{Office, OfficeInput, Overview, ServiceDetails, ServiceInput};
use crate::errors::AppResult;
use crate::policy::{Action, Principal, Resource};
use crate::types::{NoContent, OfficePage, Paginated, PaginationParams, ServicePage};

pub fn office_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_offices).post(create_office))
        .route(
            "/:id",
            get(get_office).put(update_office).delete(delete_office),
        )
}

pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route(
            "/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

/// Landing page summary
#[utoipa::path(
    get,
    path = "/",
    tag = "Catalog",
    responses(
        (status = 200, description = "Counts with the first doctors and services", body = Overview)
    )
)]
pub async fn overview(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
) -> AppResult<Json<Overview>> {
    Ok(Json(state.catalog_service.overview(&principal).await?))
}

// =============================================================================
// Offices
// =============================================================================

#[utoipa::path(
    get,
    path = "/offices",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Offices ordered by number", body = OfficePage),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_offices(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Office>>> {
    Ok(Json(state.catalog_service.list_offices(&principal, params).await?))
}

#[utoipa::path(
    get,
    path = "/offices/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Office ID")),
    responses(
        (status = 200, description = "Office", body = Office),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Office not found")
    )
)]
pub async fn get_office(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Office>> {
    Ok(Json(state.catalog_service.get_office(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/offices",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = OfficeInput,
    responses(
        (status = 201, description = "Office created", body = Office),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_office(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<OfficeInput>,
) -> AppResult<(StatusCode, Json<Office>)> {
    let payload = body.authorized(&principal, Resource::Office, Action::Create)?;
    let office = state.catalog_service.create_office(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(office)))
}

#[utoipa::path(
    put,
    path = "/offices/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Office ID")),
    request_body = OfficeInput,
    responses(
        (status = 200, description = "Office updated", body = Office),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Office not found")
    )
)]
pub async fn update_office(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<OfficeInput>,
) -> AppResult<Json<Office>> {
    let payload = body.authorized(&principal, Resource::Office, Action::Update)?;
    Ok(Json(
        state
            .catalog_service
            .update_office(&principal, id, payload)
            .await?,
    ))
}

/// Delete an office; appointments held there keep their row with no office
#[utoipa::path(
    delete,
    path = "/offices/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Office ID")),
    responses(
        (status = 204, description = "Office deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Office not found")
    )
)]
pub async fn delete_office(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_office(&principal, id).await?;
    Ok(NoContent)
}

// =============================================================================
// Services
// =============================================================================

#[utoipa::path(
    get,
    path = "/services",
    tag = "Catalog",
    params(PaginationParams),
    responses(
        (status = 200, description = "Services ordered by name", body = ServicePage)
    )
)]
pub async fn list_services(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ServiceDetails>>> {
    Ok(Json(state.catalog_service.list_services(&principal, params).await?))
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service with offices and doctors", body = ServiceDetails),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ServiceDetails>> {
    Ok(Json(state.catalog_service.get_service(&principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/services",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = ServiceInput,
    responses(
        (status = 201, description = "Service created", body = ServiceDetails),
        (status = 400, description = "Validation error or unknown office/doctor"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_service(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<ServiceInput>,
) -> AppResult<(StatusCode, Json<ServiceDetails>)> {
    let payload = body.authorized(&principal, Resource::Service, Action::Create)?;
    let service = state.catalog_service.create_service(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Update a service; the office and doctor sets are replaced wholesale
#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = ServiceInput,
    responses(
        (status = 200, description = "Service updated", body = ServiceDetails),
        (status = 400, description = "Validation error or unknown office/doctor"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<ServiceInput>,
) -> AppResult<Json<ServiceDetails>> {
    let payload = body.authorized(&principal, Resource::Service, Action::Update)?;
    Ok(Json(
        state
            .catalog_service
            .update_service(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete_service(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_service(&principal, id).await?;
    Ok(NoContent)
}
