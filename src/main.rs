use std::sync::Arc;
use ticker_sync_api::database::{establish_connection_pool, repositories::*, RegistryPool};
use ticker_sync_api::jobs::{StockListSyncJob, TickerReactivationJob};
use ticker_sync_api::{
    create_router, HttpMarketDataClient, JobState, MarketDataClient, RegistryState,
    StockListSynchronizer, SyncConfig, TickerReactivator,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticker_sync_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; bad configuration is fatal
    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to the registry database
    let pool = match establish_connection_pool(&config.database_url, config.db_pool_max_size) {
        Ok(pool) => {
            tracing::info!("✅ Registry database connection established");
            pool
        }
        Err(e) => {
            tracing::error!("❌ Failed to establish registry database connection: {}", e);
            std::process::exit(1);
        }
    };

    // Create repositories
    let (company_repository, ticker_repository) = create_repositories(&pool);

    // Create the market data client
    let market_data_client = match HttpMarketDataClient::new(
        config.market_data_base_url.clone(),
        config.market_data_api_token.clone(),
    ) {
        Ok(client) => Arc::new(client) as Arc<dyn MarketDataClient>,
        Err(e) => {
            tracing::error!("❌ Failed to build market data client: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("📡 Market data client targeting {}", config.market_data_base_url);

    // Create the synchronizer and reactivator
    let synchronizer = Arc::new(StockListSynchronizer::new(
        market_data_client,
        company_repository.clone(),
        ticker_repository.clone(),
    ));
    let reactivator = Arc::new(TickerReactivator::new(ticker_repository.clone()));

    // Create jobs (shared between the cron scheduler and the manual triggers,
    // so the overlap guard covers both)
    let sync_job = Arc::new(StockListSyncJob::new(
        synchronizer,
        config.sync_page_size,
        config.sync_max_pages,
    ));
    let reactivation_job = Arc::new(TickerReactivationJob::new(
        reactivator,
        config.reactivation,
    ));

    // Register cron schedules
    initialize_cron_scheduler(&sync_job, &reactivation_job).await;

    // Create the router
    let app = create_router(
        RegistryState {
            company_repository,
            ticker_repository,
        },
        JobState {
            sync_job,
            reactivation_job,
        },
    );

    // Start the server
    let listener = match tokio::net::TcpListener::bind(&config.server_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("❌ Failed to bind {}: {}", config.server_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 Ticker Sync API running on http://{}", config.server_addr);
    tracing::info!("📊 Health check: http://{}/api/v1/health", config.server_addr);
    tracing::info!("📚 Swagger UI: http://{}/swagger-ui", config.server_addr);
    tracing::info!(
        "🔧 Manual triggers: POST /api/v1/sync/stock-list, POST /api/v1/sync/reactivate"
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}

/// Create registry repositories over the shared pool
fn create_repositories(
    pool: &RegistryPool,
) -> (Arc<dyn CompanyRepository>, Arc<dyn TickerRepository>) {
    let pool_clone = pool.clone();
    let company_repository =
        Arc::new(CompanyRepositoryImpl::new(move || pool_clone.get_conn()))
            as Arc<dyn CompanyRepository>;

    let pool_clone = pool.clone();
    let ticker_repository = Arc::new(TickerRepositoryImpl::new(move || pool_clone.get_conn()))
        as Arc<dyn TickerRepository>;

    (company_repository, ticker_repository)
}

/// Initialize the cron scheduler for periodic jobs
async fn initialize_cron_scheduler(
    sync_job: &Arc<StockListSyncJob>,
    reactivation_job: &Arc<TickerReactivationJob>,
) {
    use tokio_cron_scheduler::JobScheduler;

    tracing::info!("⏰ Initializing cron scheduler...");

    let scheduler = match JobScheduler::new().await {
        Ok(scheduler) => scheduler,
        Err(e) => {
            tracing::error!("❌ Failed to create cron scheduler: {}", e);
            return;
        }
    };

    if let Err(e) = Arc::clone(sync_job).register(&scheduler).await {
        tracing::error!("❌ Failed to register stock list sync job: {}", e);
        return;
    }

    if let Err(e) = Arc::clone(reactivation_job).register(&scheduler).await {
        tracing::error!("❌ Failed to register ticker reactivation job: {}", e);
        return;
    }

    if let Err(e) = scheduler.start().await {
        tracing::error!("❌ Failed to start cron scheduler: {}", e);
        return;
    }

    tracing::info!("✅ Cron scheduler started successfully");
    tracing::info!("   • Stock list sync: every 6 hours");
    tracing::info!("   • Ticker reactivation: every 15 minutes");

    // Keep scheduler alive for the lifetime of the process
    std::mem::forget(scheduler);
}
