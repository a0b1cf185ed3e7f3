use async_trait::async_trait;
use std::time::Duration;

use super::client::{ListingPage, MarketDataClient, MarketDataError};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP implementation of the market data client
///
/// Calls `GET {base_url}/instruments?page={page}&per_page={page_size}` with an
/// optional bearer token. No retries; failures bubble up to the sync run.
pub struct HttpMarketDataClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpMarketDataClient {
    /// Create a new HTTP market data client
    ///
    /// Fails when the underlying client cannot be built, for example when no
    /// TLS backend is available.
    pub fn new(
        base_url: impl Into<String>,
        api_token: Option<String>,
    ) -> Result<Self, MarketDataError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MarketDataError::Initialization(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        })
    }
}

#[async_trait]
impl MarketDataClient for HttpMarketDataClient {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<ListingPage, MarketDataError> {
        let url = format!("{}/instruments", self.base_url);

        let mut request = self
            .http
            .get(&url)
            .query(&[("page", page), ("per_page", page_size)]);

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MarketDataError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketDataError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ListingPage>()
            .await
            .map_err(|e| MarketDataError::Decode(e.to_string()))
    }
}
