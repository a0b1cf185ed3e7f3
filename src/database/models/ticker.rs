use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::enums::TickerKind;

/// Ticker entity - a tradable instrument in the registry
///
/// `code` is unique across the table. Rows are never deleted: delisted
/// instruments are soft-deactivated (`status = false`) so historical data
/// keyed by the ticker stays queryable and the row can be reactivated later.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::tickers)]
pub struct Ticker {
    /// Local surrogate key
    pub id: i64,

    /// Owning company (local id)
    pub company_id: i64,

    /// Unique symbol code (e.g., "AAPL", "VWCE")
    pub code: String,

    /// Instrument classification
    pub kind: TickerKind,

    /// Active flag - false once the instrument disappears from the provider listing
    pub status: bool,

    /// Whether this ticker is eligible for automated price refresh
    pub can_update: bool,

    /// Most recent refreshed price
    #[schema(value_type = Option<String>, example = "150.50")]
    pub last_price: Option<Decimal>,

    /// Last time a price refresh was applied
    pub last_price_updated: Option<DateTime<Utc>>,

    /// Timestamp when record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when record was last updated (null for rows never touched
    /// after creation)
    pub updated_at: Option<DateTime<Utc>>,
}

/// New ticker for insertion
///
/// Fresh tickers start active and update-eligible with no price history.
#[derive(Debug, Clone, Insertable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::tickers)]
pub struct NewTicker {
    pub company_id: i64,
    pub code: String,
    pub kind: TickerKind,
    pub status: bool,
    pub can_update: bool,
}

impl NewTicker {
    pub fn new(company_id: i64, code: impl Into<String>, kind: TickerKind) -> Self {
        Self {
            company_id,
            code: code.into(),
            kind,
            status: true,
            can_update: true,
        }
    }
}

/// Mutable ticker attributes applied during sync reconciliation
///
/// `code` is immutable once created, so it never appears here.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::database::schema::tickers)]
pub struct TickerChanges {
    pub company_id: Option<i64>,
    pub kind: Option<TickerKind>,
    pub status: Option<bool>,
}

impl Ticker {
    /// Compute the changeset needed to bring this row in line with upstream
    ///
    /// Returns `None` when nothing differs, so idempotent sync passes count
    /// zero updates.
    pub fn diff(&self, company_id: i64, kind: TickerKind) -> Option<TickerChanges> {
        let mut changes = TickerChanges {
            company_id: None,
            kind: None,
            status: None,
        };
        let mut changed = false;

        if self.company_id != company_id {
            changes.company_id = Some(company_id);
            changed = true;
        }
        if self.kind != kind {
            changes.kind = Some(kind);
            changed = true;
        }
        // A ticker seen upstream again is active, whatever its previous state
        if !self.status {
            changes.status = Some(true);
            changed = true;
        }

        changed.then_some(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ticker(company_id: i64, kind: TickerKind, status: bool) -> Ticker {
        Ticker {
            id: 1,
            company_id,
            code: "AAPL".to_string(),
            kind,
            status,
            can_update: true,
            last_price: None,
            last_price_updated: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_new_ticker_defaults() {
        let t = NewTicker::new(7, "VWCE", TickerKind::Etf);
        assert_eq!(t.company_id, 7);
        assert_eq!(t.code, "VWCE");
        assert!(t.status);
        assert!(t.can_update);
    }

    #[test]
    fn test_diff_no_changes() {
        let t = ticker(7, TickerKind::Stock, true);
        assert!(t.diff(7, TickerKind::Stock).is_none());
    }

    #[test]
    fn test_diff_kind_changed() {
        let t = ticker(7, TickerKind::Stock, true);
        let changes = t.diff(7, TickerKind::Etf).unwrap();
        assert_eq!(changes.kind, Some(TickerKind::Etf));
        assert_eq!(changes.company_id, None);
        assert_eq!(changes.status, None);
    }

    #[test]
    fn test_ticker_serializes_price_as_string() {
        let mut t = ticker(7, TickerKind::Stock, true);
        t.last_price = Some(dec!(150.50));

        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["last_price"], "150.50");
        assert_eq!(json["kind"], "stock");
    }

    #[test]
    fn test_diff_reactivates_inactive_row() {
        let t = ticker(7, TickerKind::Stock, false);
        let changes = t.diff(7, TickerKind::Stock).unwrap();
        assert_eq!(changes.status, Some(true));
    }
}
