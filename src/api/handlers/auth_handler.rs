//! Authentication handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::AppState;
use crate::domain::SignUp;
use crate::errors::AppResult;
use crate::policy::{Action, Principal, Resource};
use crate::services::{SignUpResponse, TokenResponse};

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    #[schema(example = "ivanov")]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(sign_up))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(token))
}

/// Register as a patient
///
/// Creates the account, adds it to the Patient group and opens a patient
/// card, then signs the new account in.
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = SignUp,
    responses(
        (status = 201, description = "Patient registered", body = SignUpResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn sign_up(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    body: JsonBody<SignUp>,
) -> AppResult<(StatusCode, Json<SignUpResponse>)> {
    let payload = body.authorized(&principal, Resource::Registration, Action::Create)?;
    let response = state.auth_service.sign_up(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
