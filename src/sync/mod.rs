/// Stock list synchronization
///
/// Reconciles the provider's paginated instrument listing against the local
/// instrument registry and reports a six-counter summary per run.

pub mod summary;
pub mod synchronizer;

pub use summary::SyncSummary;
pub use synchronizer::{StockListSynchronizer, SyncAbortCause, SyncError};
