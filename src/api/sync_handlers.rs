use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::jobs::{StockListSyncJob, TickerReactivationJob};
use crate::scheduler::{ReactivationPolicy, ReactivationReport};
use crate::sync::{SyncError, SyncSummary};

use super::responses::{ReactivateTriggerRequest, SyncTriggerRequest};

/// Shared state for the manual job trigger endpoints
#[derive(Clone)]
pub struct JobState {
    pub sync_job: Arc<StockListSyncJob>,
    pub reactivation_job: Arc<TickerReactivationJob>,
}

/// Trigger a stock list synchronization run
///
/// Runs inline and returns the run summary. Responds 409 when a run (cron or
/// manual) is already in flight.
#[utoipa::path(
    post,
    path = "/api/v1/sync/stock-list",
    tag = "sync",
    request_body(content = SyncTriggerRequest, description = "Optional page size and page cap overrides"),
    responses(
        (status = 200, description = "Run summary", body = SyncSummary),
        (status = 400, description = "Invalid arguments"),
        (status = 409, description = "A sync run is already in flight"),
        (status = 502, description = "Run aborted by provider or database failure")
    )
)]
pub async fn trigger_stock_list_sync(
    State(state): State<JobState>,
    body: Option<Json<SyncTriggerRequest>>,
) -> Result<Json<SyncSummary>, (StatusCode, String)> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    match state
        .sync_job
        .try_run(request.page_size, request.pages)
        .await
    {
        Some(Ok(summary)) => Ok(Json(summary)),
        Some(Err(SyncError::InvalidArguments(message))) => {
            Err((StatusCode::BAD_REQUEST, message))
        }
        Some(Err(e @ SyncError::Aborted { .. })) => {
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
        None => Err((
            StatusCode::CONFLICT,
            "A stock list sync run is already in flight".to_string(),
        )),
    }
}

/// Trigger a ticker reactivation pass
///
/// Responds 409 when a pass is already in flight.
#[utoipa::path(
    post,
    path = "/api/v1/sync/reactivate",
    tag = "sync",
    request_body(content = ReactivateTriggerRequest, description = "Optional policy overrides"),
    responses(
        (status = 200, description = "Reactivation report", body = ReactivationReport),
        (status = 400, description = "Invalid policy override"),
        (status = 409, description = "A reactivation pass is already in flight"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn trigger_reactivation(
    State(state): State<JobState>,
    body: Option<Json<ReactivateTriggerRequest>>,
) -> Result<Json<ReactivationReport>, (StatusCode, String)> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    if [request.limit, request.cooldown_minutes, request.stale_minutes]
        .iter()
        .any(|v| v.is_some_and(|v| v < 0))
    {
        return Err((
            StatusCode::BAD_REQUEST,
            "limit, cooldown_minutes and stale_minutes must not be negative".to_string(),
        ));
    }

    let defaults = state.reactivation_job.policy();
    let override_needed = request.limit.is_some()
        || request.cooldown_minutes.is_some()
        || request.stale_minutes.is_some();
    let policy = override_needed.then(|| ReactivationPolicy {
        limit: request.limit.unwrap_or(defaults.limit),
        cooldown_minutes: request.cooldown_minutes.unwrap_or(defaults.cooldown_minutes),
        stale_minutes: request.stale_minutes.unwrap_or(defaults.stale_minutes),
    });

    match state.reactivation_job.try_run(policy).await {
        Some(Ok(report)) => Ok(Json(report)),
        Some(Err(e)) => {
            tracing::error!("Manual reactivation trigger failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
        None => Err((
            StatusCode::CONFLICT,
            "A reactivation pass is already in flight".to_string(),
        )),
    }
}
