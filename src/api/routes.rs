//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    account_routes, appointment_routes, auth_routes, doctor_routes, employee_routes,
    medical_test_routes, office_routes, overview, patient_routes, position_routes,
    schedule_routes, service_routes, specialization_routes,
};
use super::middleware::principal_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Every API route sees a resolved principal, anonymous included
    let api = Router::new()
        .route("/", get(overview))
        .nest("/auth", auth_routes())
        .nest("/accounts", account_routes())
        .nest("/positions", position_routes())
        .nest("/specializations", specialization_routes())
        .nest("/employees", employee_routes())
        .nest("/schedules", schedule_routes())
        .nest("/doctors", doctor_routes())
        .nest("/offices", office_routes())
        .nest("/services", service_routes())
        .nest("/patients", patient_routes())
        .nest("/appointments", appointment_routes())
        .nest("/medical-tests", medical_test_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            principal_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "healthy",
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "unhealthy",
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
