use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

use crate::database::connection::DatabaseError;
use crate::database::models::{NewCompany, NewTicker};
use crate::database::repositories::{CompanyRepository, TickerRepository};
use crate::marketdata::{InstrumentListing, MarketDataClient, MarketDataError};

use super::summary::SyncSummary;

/// What cut a synchronization run short
#[derive(Debug, Error)]
pub enum SyncAbortCause {
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Errors from the stock list synchronizer
#[derive(Debug, Error)]
pub enum SyncError {
    /// Rejected before any page was fetched
    #[error("Invalid sync arguments: {0}")]
    InvalidArguments(String),

    /// The run stopped partway; counters for pages already processed remain
    /// valid and are carried in `summary`
    #[error("Sync aborted after {} instruments: {source}", .summary.processed)]
    Aborted {
        summary: Box<SyncSummary>,
        #[source]
        source: SyncAbortCause,
    },
}

/// Stock list synchronizer
///
/// Paginates over the external market data listing, reconciles each
/// instrument against the instrument registry, and deactivates previously
/// active tickers that were absent from every page of the run.
pub struct StockListSynchronizer {
    client: Arc<dyn MarketDataClient>,
    company_repository: Arc<dyn CompanyRepository>,
    ticker_repository: Arc<dyn TickerRepository>,
}

impl StockListSynchronizer {
    /// Create a new synchronizer over the given client and registry
    pub fn new(
        client: Arc<dyn MarketDataClient>,
        company_repository: Arc<dyn CompanyRepository>,
        ticker_repository: Arc<dyn TickerRepository>,
    ) -> Self {
        Self {
            client,
            company_repository,
            ticker_repository,
        }
    }

    /// Run one synchronization pass
    ///
    /// Iterates pages `1..=max_pages`, stopping early on an empty page or when
    /// the provider reports no further pages. Transport and persistence
    /// failures abort the run; the returned error carries the partial summary.
    /// Re-running against unchanged upstream data yields all-zero change
    /// counters (only `processed` moves).
    pub async fn sync(&self, page_size: u32, max_pages: u32) -> Result<SyncSummary, SyncError> {
        if page_size == 0 {
            return Err(SyncError::InvalidArguments(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if max_pages == 0 {
            return Err(SyncError::InvalidArguments(
                "max_pages must be greater than zero".to_string(),
            ));
        }

        tracing::info!(
            "Starting stock list sync (page_size={}, max_pages={})",
            page_size,
            max_pages
        );

        let mut summary = SyncSummary::new();
        let mut seen_codes: Vec<String> = Vec::new();
        let mut seen_set: HashSet<String> = HashSet::new();
        // Company ids resolved earlier in this run; avoids re-reading (and
        // re-counting) a company shared by many tickers
        let mut company_cache: HashMap<String, i64> = HashMap::new();

        for page in 1..=max_pages {
            let listing = match self.client.fetch_page(page, page_size).await {
                Ok(listing) => listing,
                Err(e) => {
                    summary.detail(format!("page {}: fetch failed: {}", page, e));
                    tracing::error!("Stock list sync aborted on page {}: {}", page, e);
                    return Err(SyncError::Aborted {
                        summary: Box::new(summary),
                        source: e.into(),
                    });
                }
            };

            summary.detail(format!(
                "page {}: {} instruments (has_more={})",
                page,
                listing.instruments.len(),
                listing.has_more
            ));

            if listing.instruments.is_empty() {
                break;
            }

            for instrument in &listing.instruments {
                summary.processed += 1;

                if !seen_set.insert(instrument.code.clone()) {
                    summary.detail(format!(
                        "page {}: duplicate code {} skipped",
                        page, instrument.code
                    ));
                    continue;
                }
                seen_codes.push(instrument.code.clone());

                if let Err(e) =
                    self.reconcile_instrument(instrument, &mut company_cache, &mut summary)
                {
                    summary.detail(format!(
                        "page {}: persistence failed for {}: {}",
                        page, instrument.code, e
                    ));
                    tracing::error!(
                        "Stock list sync aborted while persisting {}: {}",
                        instrument.code,
                        e
                    );
                    return Err(SyncError::Aborted {
                        summary: Box::new(summary),
                        source: e.into(),
                    });
                }
            }

            if !listing.has_more {
                break;
            }
        }

        // Whatever is still active but was never seen this run has been
        // delisted upstream
        summary.deactivated_tickers = match self.ticker_repository.deactivate_missing(&seen_codes) {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("Stock list sync aborted during deactivation: {}", e);
                return Err(SyncError::Aborted {
                    summary: Box::new(summary),
                    source: e.into(),
                });
            }
        };
        if summary.deactivated_tickers > 0 {
            summary.detail(format!(
                "deactivated {} delisted tickers",
                summary.deactivated_tickers
            ));
        }

        tracing::info!("Stock list sync completed: {}", summary);

        Ok(summary)
    }

    /// Reconcile one listed instrument against the registry
    fn reconcile_instrument(
        &self,
        instrument: &InstrumentListing,
        company_cache: &mut HashMap<String, i64>,
        summary: &mut SyncSummary,
    ) -> Result<(), DatabaseError> {
        let company_id = self.resolve_company(instrument, company_cache, summary)?;

        match self.ticker_repository.find_by_code(&instrument.code)? {
            Some(existing) => {
                if let Some(changes) = existing.diff(company_id, instrument.kind) {
                    self.ticker_repository.apply_changes(existing.id, changes)?;
                    summary.updated_tickers += 1;
                }
            }
            None => {
                self.ticker_repository.insert(NewTicker::new(
                    company_id,
                    instrument.code.clone(),
                    instrument.kind,
                ))?;
                summary.created_tickers += 1;
            }
        }

        Ok(())
    }

    /// Resolve the instrument's parent company, creating or updating it
    fn resolve_company(
        &self,
        instrument: &InstrumentListing,
        company_cache: &mut HashMap<String, i64>,
        summary: &mut SyncSummary,
    ) -> Result<i64, DatabaseError> {
        if let Some(id) = company_cache.get(&instrument.company_external_id) {
            return Ok(*id);
        }

        let id = match self
            .company_repository
            .find_by_external_id(&instrument.company_external_id)?
        {
            Some(existing) => {
                if self
                    .company_repository
                    .update_name_if_changed(existing.id, &instrument.company_name)?
                {
                    summary.updated_companies += 1;
                }
                existing.id
            }
            None => {
                let created = self.company_repository.insert(NewCompany::new(
                    instrument.company_external_id.clone(),
                    instrument.company_name.clone(),
                ))?;
                summary.created_companies += 1;
                created.id
            }
        };

        company_cache.insert(instrument.company_external_id.clone(), id);
        Ok(id)
    }
}
