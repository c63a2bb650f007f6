//! Account administration handlers.

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
use crate::domain::{AccountResponse, AccountUpdate, NewAccount};
use crate::errors::AppResult;
use crate::policy::{Action, Principal, Resource};
use crate::types::{AccountPage, Paginated, PaginationParams};

/// Create account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/:id", get(get_account).put(update_account))
}

/// List accounts (administrators only)
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Accounts ordered by username", body = AccountPage),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_accounts(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    Ok(Json(state.account_service.list(&principal, params).await?))
}

/// Get account by ID
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    Ok(Json(state.account_service.get(&principal, id).await?))
}

/// Create an account with role groups
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = NewAccount,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn create_account(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<NewAccount>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let payload = body.authorized(&principal, Resource::Account, Action::Create)?;
    let account = state.account_service.create(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Update account details, active flag or role groups
#[utoipa::path(
    put,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = AccountUpdate,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_account(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonBody<AccountUpdate>,
) -> AppResult<Json<AccountResponse>> {
    let payload = body.authorized(&principal, Resource::Account, Action::Update)?;
    Ok(Json(state.account_service.update(&principal, id, payload).await?))
}
