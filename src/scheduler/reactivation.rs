use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Parameters of one reactivation pass
///
/// All time math in this module is a pure function of an injected `now`;
/// nothing here reads the wall clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ReactivationPolicy {
    /// Maximum number of tickers reactivated per pass
    pub limit: i64,

    /// Minimum elapsed minutes since a ticker's last update attempt before it
    /// becomes eligible again
    pub cooldown_minutes: i64,

    /// Staleness window of the price-refresh sweep this policy feeds into
    pub stale_minutes: i64,
}

impl Default for ReactivationPolicy {
    fn default() -> Self {
        Self {
            limit: 50,
            cooldown_minutes: 45,
            stale_minutes: 120,
        }
    }
}

impl ReactivationPolicy {
    /// Tickers whose `updated_at` is at or before this instant have served
    /// their cooldown
    pub fn cooldown_threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::minutes(self.cooldown_minutes)
    }

    /// The backdated `last_price_updated` applied on reactivation
    ///
    /// Set to `now - max(stale - cooldown, 0)` minutes, so the ticker is
    /// already older than the staleness window minus its cooldown and gets
    /// picked up by the next price-refresh sweep instead of waiting out a
    /// full fresh cycle, while still queuing behind recently refreshed peers.
    pub fn backdated_price_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let backdate_minutes = (self.stale_minutes - self.cooldown_minutes).max(0);
        now - Duration::minutes(backdate_minutes)
    }
}
