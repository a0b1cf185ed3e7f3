use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for the manual stock list sync trigger
///
/// Absent fields fall back to the configured defaults.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SyncTriggerRequest {
    /// Instruments requested per listing page
    pub page_size: Option<u32>,

    /// Hard cap on pagination loops for this run
    pub pages: Option<u32>,
}

/// Request body for the manual reactivation trigger
///
/// Absent fields fall back to the configured policy.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReactivateTriggerRequest {
    /// Maximum tickers to reactivate in this pass
    pub limit: Option<i64>,

    /// Cooldown in minutes
    pub cooldown_minutes: Option<i64>,

    /// Staleness window in minutes
    pub stale_minutes: Option<i64>,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
