//! Action Channel for asynchronous event processing

use anyhow::Result;
use tokio::sync::mpsc;

use crate::coingecko::{CoinDetail, CoinSummary};
use crate::http::FetchError;
use crate::market_data::{ChartSeries, LookbackWindow};
use crate::news::NewsArticle;

use super::generation::Generation;

/// Fetch work the UI asks the session to perform
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Markets {
        generation: Generation,
    },
    Coin {
        generation: Generation,
        id: String,
        window: LookbackWindow,
    },
    News {
        generation: Generation,
    },
}

/// One in-flight slot per kind; a newer request replaces the older task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Markets,
    Coin,
    News,
}

impl FetchRequest {
    pub fn kind(&self) -> FetchKind {
        match self {
            FetchRequest::Markets { .. } => FetchKind::Markets,
            FetchRequest::Coin { .. } => FetchKind::Coin,
            FetchRequest::News { .. } => FetchKind::News,
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            FetchRequest::Markets { generation }
            | FetchRequest::Coin { generation, .. }
            | FetchRequest::News { generation } => *generation,
        }
    }
}

/// Detail stats and chart series fetched together for the detail view
#[derive(Debug, Clone, PartialEq)]
pub struct CoinPayload {
    pub detail: CoinDetail,
    pub series: ChartSeries,
}

/// Session events for communication between components
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Shutdown request
    ShutdownRequested,
    /// Error event
    Error { message: String },
    /// UI -> session: start a fetch
    FetchRequested(FetchRequest),
    /// Session -> UI: market snapshot result
    MarketsLoaded {
        generation: Generation,
        result: Result<Vec<CoinSummary>, FetchError>,
    },
    /// Session -> UI: coin detail and chart result
    CoinLoaded {
        generation: Generation,
        result: Result<CoinPayload, FetchError>,
    },
    /// Session -> UI: news feed result
    NewsLoaded {
        generation: Generation,
        result: Result<Vec<NewsArticle>, FetchError>,
    },
}

/// Action channel for event processing
pub struct ActionChannel {
    /// Event sender
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Event receiver
    event_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
}

impl Clone for ActionChannel {
    fn clone(&self) -> Self {
        Self {
            event_tx: self.event_tx.clone(),
            event_rx: None, // Receivers cannot be cloned
        }
    }
}

impl ActionChannel {
    /// Create a new ActionChannel
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Send event to channel
    pub fn send_event(&self, event: SessionEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .map_err(|e| anyhow::anyhow!("Failed to send event: {}", e))
    }

    /// Get next event from channel
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        if let Some(event_rx) = &mut self.event_rx {
            event_rx.recv().await
        } else {
            None
        }
    }

    /// Get event sender for external use
    pub fn event_tx(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.event_tx.clone()
    }

    /// Send error event
    pub fn send_error(&self, message: String) -> Result<()> {
        self.send_event(SessionEvent::Error { message })
    }

    /// Send shutdown request
    pub fn request_shutdown(&self) -> Result<()> {
        self.send_event(SessionEvent::ShutdownRequested)
    }
}

impl Default for ActionChannel {
    fn default() -> Self {
        Self::new()
    }
}
