use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::sync::{StockListSynchronizer, SyncError, SyncSummary};

/// Stock list synchronization job
///
/// Runs every 6 hours to reconcile the provider's instrument listing against
/// the local registry. Overlapping runs are skipped, never queued: if a
/// trigger fires while the previous run is still executing, it is dropped.
pub struct StockListSyncJob {
    synchronizer: Arc<StockListSynchronizer>,
    page_size: u32,
    max_pages: u32,
    in_flight: Arc<AtomicBool>,
}

impl StockListSyncJob {
    /// Create a new stock list sync job
    pub fn new(synchronizer: Arc<StockListSynchronizer>, page_size: u32, max_pages: u32) -> Self {
        Self {
            synchronizer,
            page_size,
            max_pages,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the sync now unless a run is already in flight
    ///
    /// Returns `None` when skipped because of an overlapping run. Used both by
    /// the cron trigger and the manual API trigger, so the two can never
    /// overlap each other either. The manual trigger may override the
    /// configured page size and page cap.
    pub async fn try_run(
        &self,
        page_size_override: Option<u32>,
        max_pages_override: Option<u32>,
    ) -> Option<Result<SyncSummary, SyncError>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Stock list sync trigger skipped: previous run still executing");
            return None;
        }

        let page_size = page_size_override.unwrap_or(self.page_size);
        let max_pages = max_pages_override.unwrap_or(self.max_pages);

        let result = self.synchronizer.sync(page_size, max_pages).await;
        self.in_flight.store(false, Ordering::SeqCst);
        Some(result)
    }

    /// Register this job with the scheduler
    ///
    /// Schedule: every 6 hours (0 0 */6 * * *)
    pub async fn register(
        self: Arc<Self>,
        scheduler: &JobScheduler,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let job_ref = self;

        let job = Job::new_async("0 0 */6 * * *", move |_uuid, _lock| {
            let job_ref = Arc::clone(&job_ref);

            Box::pin(async move {
                match job_ref.try_run(None, None).await {
                    Some(Ok(summary)) => {
                        tracing::info!("Stock list sync job completed: {}", summary);
                        for line in &summary.details {
                            tracing::debug!("sync detail: {}", line);
                        }
                    }
                    Some(Err(e)) => {
                        // No retry here: the next scheduled trigger is the
                        // retry mechanism
                        tracing::error!("Stock list sync job failed: {}", e);
                    }
                    None => {}
                }
            })
        })?;

        scheduler.add(job).await?;

        tracing::info!("Stock list sync job registered (runs every 6 hours)");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::DatabaseError;
    use crate::database::models::{Company, NewCompany, NewTicker, Ticker, TickerChanges};
    use crate::database::repositories::{CompanyRepository, TickerRepository};
    use crate::marketdata::{ListingPage, MarketDataClient, MarketDataError};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Client that blocks until released, to hold a sync run open
    struct BlockingClient {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl MarketDataClient for BlockingClient {
        async fn fetch_page(
            &self,
            _page: u32,
            _page_size: u32,
        ) -> Result<ListingPage, MarketDataError> {
            self.release.notified().await;
            Ok(ListingPage {
                instruments: vec![],
                has_more: false,
            })
        }
    }

    struct NoopCompanyRepository;

    impl CompanyRepository for NoopCompanyRepository {
        fn find_by_external_id(&self, _: &str) -> Result<Option<Company>, DatabaseError> {
            Ok(None)
        }
        fn insert(&self, _: NewCompany) -> Result<Company, DatabaseError> {
            unimplemented!()
        }
        fn update_name_if_changed(&self, _: i64, _: &str) -> Result<bool, DatabaseError> {
            Ok(false)
        }
        fn get_all(&self) -> Result<Vec<Company>, DatabaseError> {
            Ok(vec![])
        }
    }

    struct NoopTickerRepository;

    impl TickerRepository for NoopTickerRepository {
        fn find_by_code(&self, _: &str) -> Result<Option<Ticker>, DatabaseError> {
            Ok(None)
        }
        fn get_all(&self) -> Result<Vec<Ticker>, DatabaseError> {
            Ok(vec![])
        }
        fn insert(&self, _: NewTicker) -> Result<Ticker, DatabaseError> {
            unimplemented!()
        }
        fn apply_changes(&self, _: i64, _: TickerChanges) -> Result<Ticker, DatabaseError> {
            unimplemented!()
        }
        fn deactivate_missing(&self, _: &[String]) -> Result<usize, DatabaseError> {
            Ok(0)
        }
        fn find_reactivation_batch(
            &self,
            _: i64,
            _: DateTime<Utc>,
        ) -> Result<Vec<Ticker>, DatabaseError> {
            Ok(vec![])
        }
        fn mark_reactivated(&self, _: i64, _: DateTime<Utc>) -> Result<Ticker, DatabaseError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_overlapping_trigger_is_skipped() {
        let release = Arc::new(Notify::new());
        let synchronizer = Arc::new(StockListSynchronizer::new(
            Arc::new(BlockingClient {
                release: release.clone(),
            }),
            Arc::new(NoopCompanyRepository),
            Arc::new(NoopTickerRepository),
        ));
        let job = Arc::new(StockListSyncJob::new(synchronizer, 100, 10));

        // Hold a run open in the background
        let background = Arc::clone(&job);
        let first = tokio::spawn(async move { background.try_run(None, None).await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Second trigger while the first is blocked
        assert!(job.try_run(None, None).await.is_none());

        // Release the first run and let it finish
        release.notify_one();
        let first_result = first.await.unwrap();
        assert!(matches!(first_result, Some(Ok(_))));

        // Guard is released again
        release.notify_one();
        assert!(job.try_run(None, None).await.is_some());
    }
}
