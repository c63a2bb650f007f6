//! JSON extractors that report malformed bodies as validation errors.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::domain::validation::format_validation_errors;
use crate::errors::{AppError, AppResult};
use crate::policy::{Action, Principal, Resource};

/// Validated JSON extractor that automatically validates requests.
///
/// For payloads that need no authorization, such as login. Payloads of
/// protected operations use [`JsonBody`].
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = parse_json::<S, T>(req, state).await?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// JSON body of a protected operation.
///
/// Extraction never rejects; a malformed body is held until
/// [`JsonBody::authorized`] has checked the caller, so a caller without
/// access sees `Forbidden` rather than details of the expected payload.
/// Field validation happens in the service.
pub struct JsonBody<T>(AppResult<T>);

impl<T> JsonBody<T> {
    /// Authorize the caller, then hand out the parsed payload.
    pub fn authorized(
        self,
        principal: &Principal,
        resource: Resource,
        action: Action,
    ) -> AppResult<T> {
        principal.authorize(resource, action)?;
        self.0
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(JsonBody(parse_json::<S, T>(req, state).await))
    }
}

async fn parse_json<S, T>(req: Request, state: &S) -> AppResult<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    let Json(value) = Json::<T>::from_request(req, state)
        .await
        .map_err(|e| AppError::validation(e.body_text()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NameInput, Role};
    use uuid::Uuid;

    fn malformed() -> JsonBody<NameInput> {
        JsonBody(Err(AppError::validation("missing field `name`")))
    }

    #[test]
    fn test_denied_caller_never_sees_payload_error() {
        let result = malformed().authorized(
            &Principal::anonymous(),
            Resource::Position,
            Action::Create,
        );
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn test_permitted_caller_gets_payload_error() {
        let admin = Principal::authenticated(Uuid::new_v4(), vec![Role::Administrator], None);
        let result = malformed().authorized(&admin, Resource::Position, Action::Create);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
