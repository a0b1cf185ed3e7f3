use utoipa::OpenApi;

use crate::api::registry_handlers;
use crate::api::responses::*;
use crate::api::sync_handlers;
use crate::database::enums::TickerKind;
use crate::database::models::{Company, Ticker};
use crate::scheduler::{FailedReactivation, ReactivationReport};
use crate::sync::SyncSummary;

/// OpenAPI specification
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ticker Sync API",
        version = "1.0.0",
        description = "Market data synchronization service: instrument registry, stock list sync, and staleness-driven ticker reactivation"
    ),
    paths(
        registry_handlers::health_check,
        registry_handlers::get_tickers,
        registry_handlers::get_ticker_by_code,
        registry_handlers::get_companies,
        sync_handlers::trigger_stock_list_sync,
        sync_handlers::trigger_reactivation,
    ),
    components(
        schemas(
            Company,
            Ticker,
            TickerKind,
            SyncSummary,
            SyncTriggerRequest,
            ReactivateTriggerRequest,
            ReactivationReport,
            FailedReactivation,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "registry", description = "Instrument registry read endpoints"),
        (name = "sync", description = "Manual synchronization and reactivation triggers"),
    )
)]
pub struct ApiDoc;
