//! CoinGecko API data types and structures

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the `/coins/markets` snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total_volume: f64,
    #[serde(
        default,
        rename = "price_change_percentage_1h_in_currency",
        alias = "price_change_percentage_1h"
    )]
    pub price_change_percentage_1h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(
        default,
        rename = "price_change_percentage_7d_in_currency",
        alias = "price_change_percentage_7d"
    )]
    pub price_change_percentage_7d: Option<f64>,
}

impl CoinSummary {
    /// Create a summary with only the fields the list pipeline looks at
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: String::new(),
            current_price: 0.0,
            market_cap: 0.0,
            total_volume: 0.0,
            price_change_percentage_1h: None,
            price_change_percentage_24h: None,
            price_change_percentage_7d: None,
        }
    }
}

/// Detail stats for a single coin, as returned by `/coins/markets?ids=<id>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total_volume: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub high_24h: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub low_24h: f64,
}

/// A single historical price sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }
}

/// `/coins/{id}/market_chart` response; only `prices` is consumed
#[derive(Debug, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<[f64; 2]>,
}

impl MarketChartResponse {
    /// Convert raw `[timestamp, price]` pairs into price points, keeping order
    pub fn into_points(self) -> Vec<PricePoint> {
        self.prices
            .into_iter()
            .map(|[timestamp, price]| PricePoint::new(timestamp as i64, price))
            .collect()
    }
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_summary_tolerates_nulls_and_suffixed_fields() {
        let raw = r#"{
            "id": "bitcoin",
            "name": "Bitcoin",
            "symbol": "btc",
            "image": null,
            "current_price": 64000.5,
            "market_cap": null,
            "total_volume": 12.0,
            "price_change_percentage_1h_in_currency": 0.4,
            "price_change_percentage_24h": -1.2,
            "price_change_percentage_7d_in_currency": 3.3
        }"#;

        let coin: CoinSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(coin.image, "");
        assert_eq!(coin.market_cap, 0.0);
        assert_eq!(coin.price_change_percentage_1h, Some(0.4));
        assert_eq!(coin.price_change_percentage_24h, Some(-1.2));
        assert_eq!(coin.price_change_percentage_7d, Some(3.3));
    }

    #[test]
    fn test_market_chart_points_keep_order() {
        let raw = r#"{"prices": [[1700000000000, 10.0], [1700003600000, 11.5]], "total_volumes": []}"#;
        let response: MarketChartResponse = serde_json::from_str(raw).unwrap();
        let points = response.into_points();
        assert_eq!(
            points,
            vec![
                PricePoint::new(1_700_000_000_000, 10.0),
                PricePoint::new(1_700_003_600_000, 11.5)
            ]
        );
    }
}
