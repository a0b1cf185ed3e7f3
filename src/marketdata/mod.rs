/// External market data provider integration
///
/// The provider is consumed through the `MarketDataClient` trait so the sync
/// workflow can be tested against scripted in-memory clients.

pub mod client;
pub mod http_client;

pub use client::{InstrumentListing, ListingPage, MarketDataClient, MarketDataError};
pub use http_client::HttpMarketDataClient;
