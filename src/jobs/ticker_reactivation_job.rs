use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::database::connection::DatabaseError;
use crate::scheduler::{ReactivationPolicy, ReactivationReport, TickerReactivator};

/// Ticker reactivation job
///
/// Runs every 15 minutes to bring tickers that fell out of the price-refresh
/// rotation back in once their cooldown has elapsed. Like the sync job, an
/// overlapping trigger is skipped rather than queued.
pub struct TickerReactivationJob {
    reactivator: Arc<TickerReactivator>,
    policy: ReactivationPolicy,
    in_flight: Arc<AtomicBool>,
}

impl TickerReactivationJob {
    /// Create a new reactivation job
    pub fn new(reactivator: Arc<TickerReactivator>, policy: ReactivationPolicy) -> Self {
        Self {
            reactivator,
            policy,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The configured default policy
    pub fn policy(&self) -> ReactivationPolicy {
        self.policy
    }

    /// Run the reactivation pass now unless one is already in flight
    ///
    /// Returns `None` when skipped because of an overlapping run. The pass
    /// itself runs on the blocking pool since the registry writes are
    /// synchronous diesel calls.
    pub async fn try_run(
        &self,
        policy_override: Option<ReactivationPolicy>,
    ) -> Option<Result<ReactivationReport, DatabaseError>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Reactivation trigger skipped: previous run still executing");
            return None;
        }

        let reactivator = Arc::clone(&self.reactivator);
        let policy = policy_override.unwrap_or(self.policy);

        let result = tokio::task::spawn_blocking(move || {
            reactivator.reactivate(&policy, Utc::now())
        })
        .await
        .unwrap_or_else(|e| Err(DatabaseError::QueryError(format!("task join error: {}", e))));

        self.in_flight.store(false, Ordering::SeqCst);
        Some(result)
    }

    /// Register this job with the scheduler
    ///
    /// Schedule: every 15 minutes (0 */15 * * * *)
    pub async fn register(
        self: Arc<Self>,
        scheduler: &JobScheduler,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let job_ref = self;

        let job = Job::new_async("0 */15 * * * *", move |_uuid, _lock| {
            let job_ref = Arc::clone(&job_ref);

            Box::pin(async move {
                match job_ref.try_run(None).await {
                    Some(Ok(report)) => {
                        if report.count() > 0 || !report.failed.is_empty() {
                            tracing::info!(
                                "Reactivation job completed: {} reactivated, {} failed",
                                report.count(),
                                report.failed.len()
                            );
                        }
                    }
                    Some(Err(e)) => {
                        tracing::error!("Reactivation job failed: {}", e);
                    }
                    None => {}
                }
            })
        })?;

        scheduler.add(job).await?;

        tracing::info!("Ticker reactivation job registered (runs every 15 minutes)");

        Ok(())
    }
}
