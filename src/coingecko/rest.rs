//! CoinGecko REST API client implementation

use tracing::{debug, info, warn};

use super::types::{CoinDetail, CoinSummary, MarketChartResponse, PricePoint};
use crate::http::{FetchError, HttpFetcher};
use crate::market_data::LookbackWindow;

/// CoinGecko REST API client
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    vs_currency: String,
    http: HttpFetcher,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, vs_currency: impl Into<String>, http: HttpFetcher) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            vs_currency: vs_currency.into(),
            http,
        }
    }

    /// Fetch the current market snapshot
    pub async fn fetch_markets(&self) -> Result<Vec<CoinSummary>, FetchError> {
        let url = format!("{}/coins/markets", self.base_url);
        let query = [
            ("vs_currency", self.vs_currency.clone()),
            ("price_change_percentage", "1h,24h,7d".to_string()),
        ];

        let coins: Vec<CoinSummary> = self.http.get_json(&url, &query).await?;

        info!("Fetched market snapshot: {} coins", coins.len());
        Ok(coins)
    }

    /// Fetch current stats for a single coin
    pub async fn fetch_coin_detail(&self, id: &str) -> Result<CoinDetail, FetchError> {
        let url = format!("{}/coins/markets", self.base_url);
        let query = [
            ("vs_currency", self.vs_currency.clone()),
            ("ids", id.to_string()),
        ];

        let coins: Vec<CoinDetail> = self.http.get_json(&url, &query).await?;

        match coins.into_iter().next() {
            Some(detail) => {
                debug!("Fetched detail for {}: price {}", id, detail.current_price);
                Ok(detail)
            }
            None => {
                warn!("Detail request for {} returned no rows", id);
                Err(FetchError::EmptyResult(format!("no market data for coin '{}'", id)))
            }
        }
    }

    /// Fetch the historical price series for a lookback window
    pub async fn fetch_market_chart(
        &self,
        id: &str,
        window: LookbackWindow,
    ) -> Result<Vec<PricePoint>, FetchError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, id);
        let query = [
            ("vs_currency", self.vs_currency.clone()),
            ("days", window.days().to_string()),
            ("interval", window.granularity().as_str().to_string()),
        ];

        let response: MarketChartResponse = self.http.get_json(&url, &query).await?;
        let points = response.into_points();

        info!(
            "Fetched {} price points for {} ({} days, {})",
            points.len(),
            id,
            window.days(),
            window.granularity()
        );

        Ok(points)
    }
}
