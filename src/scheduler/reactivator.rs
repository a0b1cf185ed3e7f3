use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::database::connection::DatabaseError;
use crate::database::repositories::TickerRepository;

use super::reactivation::ReactivationPolicy;

/// A ticker the reactivation pass could not save
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FailedReactivation {
    pub code: String,
    pub reason: String,
}

/// Per-run outcome of a reactivation pass
///
/// Every selected ticker lands in exactly one of the two lists, so partial
/// failures are visible instead of silently absent from a log line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReactivationReport {
    /// Codes flipped back to update-eligible, in processing order
    pub reactivated: Vec<String>,

    /// Codes whose save failed, with the failure reason
    pub failed: Vec<FailedReactivation>,
}

impl ReactivationReport {
    /// Number of tickers actually mutated
    pub fn count(&self) -> usize {
        self.reactivated.len()
    }
}

/// Ticker reactivation pass
///
/// Selects tickers that dropped out of the price-refresh rotation
/// (`can_update = false`) and have served their cooldown, then re-queues them
/// behind freshly updated peers by backdating `last_price_updated`. This is
/// the bounded, time-based retry half of the refresh-failure feedback loop.
pub struct TickerReactivator {
    ticker_repository: Arc<dyn TickerRepository>,
}

impl TickerReactivator {
    /// Create a new reactivator over the registry
    pub fn new(ticker_repository: Arc<dyn TickerRepository>) -> Self {
        Self { ticker_repository }
    }

    /// Run one reactivation pass at the given instant
    ///
    /// Selection is oldest-first and bounded by `policy.limit`. Each save is
    /// independent: a failed row is reported and the rest of the batch is
    /// still attempted. An empty eligible set is a normal outcome, not an
    /// error.
    pub fn reactivate(
        &self,
        policy: &ReactivationPolicy,
        now: DateTime<Utc>,
    ) -> Result<ReactivationReport, DatabaseError> {
        let batch = self
            .ticker_repository
            .find_reactivation_batch(policy.limit, policy.cooldown_threshold(now))?;

        if batch.is_empty() {
            tracing::debug!("No tickers eligible for reactivation");
            return Ok(ReactivationReport::default());
        }

        tracing::info!("Reactivating {} tickers", batch.len());

        let backdated_to = policy.backdated_price_timestamp(now);
        let mut report = ReactivationReport::default();

        for ticker in batch {
            match self.ticker_repository.mark_reactivated(ticker.id, backdated_to) {
                Ok(saved) => report.reactivated.push(saved.code),
                Err(e) => {
                    tracing::error!("Failed to reactivate ticker {}: {}", ticker.code, e);
                    report.failed.push(FailedReactivation {
                        code: ticker.code,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Reactivation pass completed: {} reactivated, {} failed (codes: {})",
            report.count(),
            report.failed.len(),
            report.reactivated.join(", ")
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::enums::TickerKind;
    use crate::database::models::{NewTicker, Ticker, TickerChanges};
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory registry implementing the real selection and ordering
    /// semantics, with failure injection per code
    #[derive(Default)]
    struct InMemoryTickerRepository {
        rows: Mutex<Vec<Ticker>>,
        fail_codes: Mutex<HashSet<String>>,
    }

    impl InMemoryTickerRepository {
        fn push(&self, ticker: Ticker) {
            self.rows.lock().unwrap().push(ticker);
        }

        fn fail_on(&self, code: &str) {
            self.fail_codes.lock().unwrap().insert(code.to_string());
        }

        fn get(&self, code: &str) -> Ticker {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.code == code)
                .cloned()
                .unwrap()
        }
    }

    impl TickerRepository for InMemoryTickerRepository {
        fn find_by_code(&self, _code: &str) -> Result<Option<Ticker>, DatabaseError> {
            unimplemented!()
        }

        fn get_all(&self) -> Result<Vec<Ticker>, DatabaseError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        fn insert(&self, _new_ticker: NewTicker) -> Result<Ticker, DatabaseError> {
            unimplemented!()
        }

        fn apply_changes(&self, _id: i64, _changes: TickerChanges) -> Result<Ticker, DatabaseError> {
            unimplemented!()
        }

        fn deactivate_missing(&self, _seen_codes: &[String]) -> Result<usize, DatabaseError> {
            unimplemented!()
        }

        fn find_reactivation_batch(
            &self,
            limit: i64,
            cooldown_threshold: DateTime<Utc>,
        ) -> Result<Vec<Ticker>, DatabaseError> {
            let rows = self.rows.lock().unwrap();
            let mut eligible: Vec<Ticker> = rows
                .iter()
                .filter(|t| !t.can_update && t.status)
                .filter(|t| t.updated_at.map_or(true, |u| u <= cooldown_threshold))
                .cloned()
                .collect();
            eligible.sort_by_key(|t| {
                t.last_price_updated
                    .or(t.updated_at)
                    .unwrap_or(t.created_at)
            });
            eligible.truncate(limit as usize);
            Ok(eligible)
        }

        fn mark_reactivated(
            &self,
            id: i64,
            backdated_to: DateTime<Utc>,
        ) -> Result<Ticker, DatabaseError> {
            let mut rows = self.rows.lock().unwrap();
            let ticker = rows.iter_mut().find(|t| t.id == id).unwrap();
            if self.fail_codes.lock().unwrap().contains(&ticker.code) {
                return Err(DatabaseError::QueryError("save failed".to_string()));
            }
            ticker.can_update = true;
            ticker.last_price_updated = Some(backdated_to);
            ticker.updated_at = Some(Utc::now());
            Ok(ticker.clone())
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ticker(
        id: i64,
        code: &str,
        can_update: bool,
        status: bool,
        updated_minutes_ago: Option<i64>,
        price_updated_minutes_ago: Option<i64>,
    ) -> Ticker {
        let now = fixed_now();
        Ticker {
            id,
            company_id: 1,
            code: code.to_string(),
            kind: TickerKind::Stock,
            status,
            can_update,
            last_price: None,
            last_price_updated: price_updated_minutes_ago.map(|m| now - Duration::minutes(m)),
            created_at: now - Duration::days(30),
            updated_at: updated_minutes_ago.map(|m| now - Duration::minutes(m)),
        }
    }

    fn policy() -> ReactivationPolicy {
        ReactivationPolicy {
            limit: 50,
            cooldown_minutes: 45,
            stale_minutes: 120,
        }
    }

    #[test]
    fn test_cooldown_selects_old_not_recent() {
        let repo = Arc::new(InMemoryTickerRepository::default());
        repo.push(ticker(1, "T1", false, true, Some(200), None));
        repo.push(ticker(2, "T2", false, true, Some(10), None));

        let reactivator = TickerReactivator::new(repo.clone());
        let report = reactivator.reactivate(&policy(), fixed_now()).unwrap();

        assert_eq!(report.reactivated, vec!["T1".to_string()]);
        assert!(repo.get("T1").can_update);
        assert!(!repo.get("T2").can_update);
    }

    #[test]
    fn test_oldest_first_and_limit() {
        let repo = Arc::new(InMemoryTickerRepository::default());
        repo.push(ticker(1, "MID", false, true, Some(100), Some(300)));
        repo.push(ticker(2, "OLDEST", false, true, Some(100), Some(500)));
        repo.push(ticker(3, "NEWEST", false, true, Some(100), Some(200)));

        let reactivator = TickerReactivator::new(repo);
        let mut limited = policy();
        limited.limit = 2;
        let report = reactivator.reactivate(&limited, fixed_now()).unwrap();

        assert_eq!(
            report.reactivated,
            vec!["OLDEST".to_string(), "MID".to_string()]
        );
    }

    #[test]
    fn test_never_updated_ticker_is_eligible() {
        let repo = Arc::new(InMemoryTickerRepository::default());
        repo.push(ticker(1, "FRESH", false, true, None, None));

        let reactivator = TickerReactivator::new(repo);
        let report = reactivator.reactivate(&policy(), fixed_now()).unwrap();

        assert_eq!(report.count(), 1);
    }

    #[test]
    fn test_inactive_and_updatable_tickers_are_excluded() {
        let repo = Arc::new(InMemoryTickerRepository::default());
        repo.push(ticker(1, "DELISTED", false, false, Some(500), None));
        repo.push(ticker(2, "HEALTHY", true, true, Some(500), None));

        let reactivator = TickerReactivator::new(repo);
        let report = reactivator.reactivate(&policy(), fixed_now()).unwrap();

        assert_eq!(report.count(), 0);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_backdated_timestamp_applied() {
        let repo = Arc::new(InMemoryTickerRepository::default());
        repo.push(ticker(1, "T1", false, true, Some(200), None));

        let reactivator = TickerReactivator::new(repo.clone());
        reactivator.reactivate(&policy(), fixed_now()).unwrap();

        // cooldown=45, stale=120 -> last_price_updated = now - 75min
        let expected = fixed_now() - Duration::minutes(75);
        assert_eq!(repo.get("T1").last_price_updated, Some(expected));
    }

    #[test]
    fn test_empty_eligible_set_is_a_clean_noop() {
        let repo = Arc::new(InMemoryTickerRepository::default());
        let reactivator = TickerReactivator::new(repo);

        let report = reactivator.reactivate(&policy(), fixed_now()).unwrap();

        assert_eq!(report.count(), 0);
        assert!(report.reactivated.is_empty());
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_row_failure_does_not_abort_the_batch() {
        let repo = Arc::new(InMemoryTickerRepository::default());
        repo.push(ticker(1, "A", false, true, Some(300), Some(300)));
        repo.push(ticker(2, "B", false, true, Some(200), Some(200)));
        repo.push(ticker(3, "C", false, true, Some(100), Some(100)));
        repo.fail_on("B");

        let reactivator = TickerReactivator::new(repo.clone());
        let report = reactivator.reactivate(&policy(), fixed_now()).unwrap();

        assert_eq!(report.reactivated, vec!["A".to_string(), "C".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].code, "B");
        assert!(repo.get("A").can_update);
        assert!(!repo.get("B").can_update);
        assert!(repo.get("C").can_update);
    }
}
