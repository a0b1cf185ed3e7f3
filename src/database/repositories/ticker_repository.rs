use crate::database::connection::{DatabaseError, PgPooledConnection};
use crate::database::models::{NewTicker, Ticker, TickerChanges};
use crate::database::schema::tickers;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Timestamptz;
use std::sync::Arc;

/// Ticker repository trait - defines interface for ticker operations
///
/// Tickers are soft-deactivated, never deleted, so the reactivation job can
/// bring them back after their cooldown has elapsed.
pub trait TickerRepository: Send + Sync {
    /// Find ticker by its unique code
    fn find_by_code(&self, code: &str) -> Result<Option<Ticker>, DatabaseError>;

    /// Get all tickers
    fn get_all(&self) -> Result<Vec<Ticker>, DatabaseError>;

    /// Insert a new ticker
    fn insert(&self, new_ticker: NewTicker) -> Result<Ticker, DatabaseError>;

    /// Apply a reconciliation changeset, stamping `updated_at`
    fn apply_changes(&self, id: i64, changes: TickerChanges) -> Result<Ticker, DatabaseError>;

    /// Deactivate active tickers whose code was not seen in the current sync run
    ///
    /// Returns the number of rows deactivated.
    fn deactivate_missing(&self, seen_codes: &[String]) -> Result<usize, DatabaseError>;

    /// Select tickers eligible for reactivation, oldest first
    ///
    /// Eligible: `can_update = false`, `status = true`, and `updated_at` is
    /// null or at or before `cooldown_threshold`. Ordered by
    /// `COALESCE(last_price_updated, updated_at, created_at)` ascending,
    /// bounded by `limit`.
    fn find_reactivation_batch(
        &self,
        limit: i64,
        cooldown_threshold: DateTime<Utc>,
    ) -> Result<Vec<Ticker>, DatabaseError>;

    /// Flip a ticker back to update-eligible, backdating its price timestamp
    fn mark_reactivated(
        &self,
        id: i64,
        backdated_to: DateTime<Utc>,
    ) -> Result<Ticker, DatabaseError>;
}

/// Concrete implementation of TickerRepository backed by PostgreSQL
pub struct TickerRepositoryImpl {
    get_conn: Arc<dyn Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync>,
}

impl TickerRepositoryImpl {
    /// Create new ticker repository with connection provider
    pub fn new<F>(get_conn: F) -> Self
    where
        F: Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync + 'static,
    {
        Self {
            get_conn: Arc::new(get_conn),
        }
    }
}

impl TickerRepository for TickerRepositoryImpl {
    fn find_by_code(&self, code: &str) -> Result<Option<Ticker>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        tickers::table
            .filter(tickers::code.eq(code))
            .first::<Ticker>(&mut conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn get_all(&self) -> Result<Vec<Ticker>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        tickers::table
            .order(tickers::code.asc())
            .load::<Ticker>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn insert(&self, new_ticker: NewTicker) -> Result<Ticker, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::insert_into(tickers::table)
            .values(&new_ticker)
            .get_result::<Ticker>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn apply_changes(&self, id: i64, changes: TickerChanges) -> Result<Ticker, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::update(tickers::table)
            .filter(tickers::id.eq(id))
            .set((&changes, tickers::updated_at.eq(Some(Utc::now()))))
            .get_result::<Ticker>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn deactivate_missing(&self, seen_codes: &[String]) -> Result<usize, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::update(tickers::table)
            .filter(tickers::status.eq(true))
            .filter(tickers::code.ne_all(seen_codes))
            .set((
                tickers::status.eq(false),
                tickers::updated_at.eq(Some(Utc::now())),
            ))
            .execute(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn find_reactivation_batch(
        &self,
        limit: i64,
        cooldown_threshold: DateTime<Utc>,
    ) -> Result<Vec<Ticker>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        tickers::table
            .filter(tickers::can_update.eq(false))
            .filter(tickers::status.eq(true))
            .filter(
                tickers::updated_at
                    .is_null()
                    .or(tickers::updated_at.le(Some(cooldown_threshold))),
            )
            .order(sql::<Timestamptz>(
                "COALESCE(last_price_updated, updated_at, created_at)",
            ))
            .limit(limit)
            .load::<Ticker>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn mark_reactivated(
        &self,
        id: i64,
        backdated_to: DateTime<Utc>,
    ) -> Result<Ticker, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::update(tickers::table)
            .filter(tickers::id.eq(id))
            .set((
                tickers::can_update.eq(true),
                tickers::last_price_updated.eq(Some(backdated_to)),
                tickers::updated_at.eq(Some(Utc::now())),
            ))
            .get_result::<Ticker>(&mut conn)
            .map_err(DatabaseError::from)
    }
}
