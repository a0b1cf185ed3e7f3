/// Cron jobs and scheduled tasks module
///
/// Contains background jobs that run on a schedule:
/// - Stock list synchronization from the market data provider
/// - Ticker reactivation after cooldown

pub mod stock_list_sync_job;
pub mod ticker_reactivation_job;

pub use stock_list_sync_job::StockListSyncJob;
pub use ticker_reactivation_job::TickerReactivationJob;
