use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::database::enums::TickerKind;

/// One instrument record from the provider's listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstrumentListing {
    /// Provider's stable identifier for the instrument
    pub external_id: String,

    /// Unique symbol code
    pub code: String,

    /// Provider's stable identifier for the issuing company
    pub company_external_id: String,

    /// Company display name
    pub company_name: String,

    /// Instrument classification
    pub kind: TickerKind,
}

/// One page of the provider's instrument listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingPage {
    pub instruments: Vec<InstrumentListing>,

    /// Whether the provider reports further pages after this one
    pub has_more: bool,
}

/// Errors from the external market data provider
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// The HTTP client itself could not be constructed
    #[error("Client initialization error: {0}")]
    Initialization(String),

    /// Provider unreachable or request failed at the transport level
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider responded but the payload did not decode
    #[error("Decode error: {0}")]
    Decode(String),

    /// Provider returned a non-success HTTP status
    #[error("Provider returned status {status}: {message}")]
    ApiError { status: u16, message: String },
}

/// External market data client
///
/// Fetches paginated listings of tradable instruments. Implementations do not
/// retry: a failed fetch aborts the current sync run and the next scheduled
/// trigger is the retry mechanism.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetch one page of the instrument listing
    ///
    /// Pages are 1-based. `page_size` is the number of instruments requested;
    /// the provider may return fewer on the final page.
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<ListingPage, MarketDataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_page_decodes_provider_payload() {
        let payload = r#"{
            "instruments": [
                {
                    "external_id": "ins-1",
                    "code": "AAPL",
                    "company_external_id": "com-1",
                    "company_name": "Apple Inc.",
                    "kind": "stock"
                }
            ],
            "has_more": true
        }"#;

        let page: ListingPage = serde_json::from_str(payload).unwrap();
        assert_eq!(page.instruments.len(), 1);
        assert_eq!(page.instruments[0].code, "AAPL");
        assert_eq!(page.instruments[0].kind, TickerKind::Stock);
        assert!(page.has_more);
    }

    #[test]
    fn test_listing_page_rejects_unknown_kind() {
        let payload = r#"{
            "instruments": [
                {
                    "external_id": "ins-1",
                    "code": "XYZ",
                    "company_external_id": "com-1",
                    "company_name": "Unknown Co",
                    "kind": "warrant"
                }
            ],
            "has_more": false
        }"#;

        let page: Result<ListingPage, _> = serde_json::from_str(payload);
        assert!(page.is_err());
    }
}
