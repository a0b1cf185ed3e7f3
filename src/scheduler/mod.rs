/// Staleness scheduler
///
/// Cooldown and backdating math plus the reactivation pass that feeds
/// deactivated tickers back into the price-refresh rotation.

pub mod reactivation;
pub mod reactivator;

pub use reactivation::ReactivationPolicy;
pub use reactivator::{FailedReactivation, ReactivationReport, TickerReactivator};
