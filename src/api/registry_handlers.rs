use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::database::models::{Company, Ticker};
use crate::database::repositories::{CompanyRepository, TickerRepository};

use super::responses::HealthResponse;

/// Shared state for registry read endpoints
#[derive(Clone)]
pub struct RegistryState {
    pub company_repository: Arc<dyn CompanyRepository>,
    pub ticker_repository: Arc<dyn TickerRepository>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

/// Get all tickers (active and deactivated)
#[utoipa::path(
    get,
    path = "/api/v1/tickers",
    tag = "registry",
    responses(
        (status = 200, description = "List of all tickers", body = Vec<Ticker>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_tickers(
    State(state): State<RegistryState>,
) -> Result<Json<Vec<Ticker>>, (StatusCode, String)> {
    state.ticker_repository.get_all().map(Json).map_err(|e| {
        tracing::error!("Failed to get tickers: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// Get ticker by code
#[utoipa::path(
    get,
    path = "/api/v1/tickers/{code}",
    tag = "registry",
    params(
        ("code" = String, Path, description = "Ticker code (e.g., AAPL)")
    ),
    responses(
        (status = 200, description = "Ticker details", body = Ticker),
        (status = 404, description = "Ticker not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_ticker_by_code(
    State(state): State<RegistryState>,
    Path(code): Path<String>,
) -> Result<Json<Ticker>, (StatusCode, String)> {
    state
        .ticker_repository
        .find_by_code(&code)
        .map_err(|e| {
            tracing::error!("Failed to get ticker {}: {}", code, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Ticker {} not found", code)))
}

/// Get all companies
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    tag = "registry",
    responses(
        (status = 200, description = "List of all companies", body = Vec<Company>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_companies(
    State(state): State<RegistryState>,
) -> Result<Json<Vec<Company>>, (StatusCode, String)> {
    state.company_repository.get_all().map(Json).map_err(|e| {
        tracing::error!("Failed to get companies: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}
