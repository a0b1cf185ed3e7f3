// Library Crate Root
// lib.rs

pub mod api;
pub mod config;
pub mod database;
pub mod jobs;
pub mod marketdata;
pub mod scheduler;
pub mod sync;

pub use api::{create_router, JobState, RegistryState};
pub use config::SyncConfig;
pub use marketdata::{HttpMarketDataClient, MarketDataClient};
pub use scheduler::{ReactivationPolicy, TickerReactivator};
pub use sync::{StockListSynchronizer, SyncSummary};
