use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of one stock list synchronization run
///
/// Six counters plus an ordered free-text detail log (one line per page
/// fetched and per anomaly). Immutable once the run completes; persisted only
/// as a log record, never as durable state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SyncSummary {
    /// Instrument records returned by the provider and handled this run
    pub processed: usize,

    /// Tickers created because their code was unknown
    pub created_tickers: usize,

    /// Tickers whose attributes actually changed
    pub updated_tickers: usize,

    /// Previously active tickers absent from every page this run
    pub deactivated_tickers: usize,

    /// Companies created because their external id was unknown
    pub created_companies: usize,

    /// Companies whose display attributes actually changed
    pub updated_companies: usize,

    /// Free-text detail lines accumulated during the run
    pub details: Vec<String>,
}

impl SyncSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a detail line to the run log
    pub fn detail(&mut self, line: impl Into<String>) {
        self.details.push(line.into());
    }

    /// True when the run changed nothing (the idempotent re-run case)
    pub fn is_noop(&self) -> bool {
        self.created_tickers == 0
            && self.updated_tickers == 0
            && self.deactivated_tickers == 0
            && self.created_companies == 0
            && self.updated_companies == 0
    }
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "processed={} created_tickers={} updated_tickers={} deactivated_tickers={} created_companies={} updated_companies={}",
            self.processed,
            self.created_tickers,
            self.updated_tickers,
            self.deactivated_tickers,
            self.created_companies,
            self.updated_companies,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_summary_is_noop() {
        let mut summary = SyncSummary::new();
        assert!(summary.is_noop());

        summary.processed = 10;
        assert!(summary.is_noop(), "processed alone does not make a run a change");

        summary.updated_tickers = 1;
        assert!(!summary.is_noop());
    }

    #[test]
    fn test_display_has_all_counters() {
        let summary = SyncSummary {
            processed: 5,
            created_tickers: 1,
            updated_tickers: 2,
            deactivated_tickers: 3,
            created_companies: 4,
            updated_companies: 0,
            details: vec![],
        };
        let line = summary.to_string();
        assert!(line.contains("processed=5"));
        assert!(line.contains("deactivated_tickers=3"));
    }
}
