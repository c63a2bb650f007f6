//! Bearer-token principal middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Principal middleware.
///
/// Resolves the caller from the Authorization header and injects the
/// `Principal` into the request extensions. Requests without the header
/// proceed as anonymous; a malformed or invalid token is rejected.
pub async fn principal_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(
            value
                .to_str()
                .ok()
                .and_then(|header| header.strip_prefix(BEARER_TOKEN_PREFIX))
                .ok_or(AppError::Unauthorized)?,
        ),
    };

    let principal = state.auth_service.resolve_principal(token).await?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
