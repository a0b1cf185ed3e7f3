use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::openapi::ApiDoc;
use super::registry_handlers::{
    get_companies, get_ticker_by_code, get_tickers, health_check, RegistryState,
};
use super::sync_handlers::{trigger_reactivation, trigger_stock_list_sync, JobState};

/// Create the API router with Swagger UI
pub fn create_router(registry_state: RegistryState, job_state: JobState) -> Router {
    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        // Health endpoint
        .route("/api/v1/health", get(health_check))
        // Registry read endpoints
        .route("/api/v1/tickers", get(get_tickers))
        .route("/api/v1/tickers/:code", get(get_ticker_by_code))
        .route("/api/v1/companies", get(get_companies))
        .with_state(registry_state)
        // Manual job triggers
        .merge(
            Router::new()
                .route("/api/v1/sync/stock-list", post(trigger_stock_list_sync))
                .route("/api/v1/sync/reactivate", post(trigger_reactivation))
                .with_state(job_state),
        )
}
