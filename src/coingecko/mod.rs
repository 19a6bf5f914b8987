//! CoinGecko API integration module
//!
//! Handles the market snapshot, coin detail and market chart REST calls.

pub mod rest;
pub mod types;

// Re-export commonly used types
pub use rest::CoinGeckoClient;
pub use types::*;
