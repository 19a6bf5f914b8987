//! Session Manager for fetch dispatch and interactive session lifecycle

use anyhow::Result;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cli::Cli;
use crate::coingecko::CoinGeckoClient;
use crate::config::Config;
use crate::http::HttpFetcher;
use crate::market_data::build_series;
use crate::news::NewsClient;
use crate::ui::ui_manager::UIManager;

use super::action_channel::{ActionChannel, CoinPayload, FetchKind, FetchRequest, SessionEvent};

/// Session state tracking
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Starting,
    Running,
    ShuttingDown,
    Terminated,
}

/// Session statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub fetches_dispatched: u64,
    pub fetches_superseded: u64,
    pub events_processed: u64,
    pub errors_encountered: u64,
}

/// Upstream clients shared by every fetch task
#[derive(Debug, Clone)]
pub struct Fetchers {
    pub coingecko: CoinGeckoClient,
    pub news: NewsClient,
}

impl Fetchers {
    pub fn from_config(config: &Config) -> Self {
        let http = HttpFetcher::new(config.api.timeout_seconds.map(Duration::from_secs));

        Self {
            coingecko: CoinGeckoClient::new(
                config.api.market_url.clone(),
                config.api.vs_currency.clone(),
                http.clone(),
            ),
            news: NewsClient::new(
                config.api.news_url.clone(),
                config.api.news_lang.clone(),
                config.api.news_api_key.clone(),
                http,
            ),
        }
    }

    /// Run a request to completion and wrap the outcome as a UI event
    pub async fn execute(&self, request: FetchRequest) -> SessionEvent {
        match request {
            FetchRequest::Markets { generation } => {
                let result = self.coingecko.fetch_markets().await;
                if let Err(e) = &result {
                    error!("Failed to fetch market snapshot: {}", e);
                }
                SessionEvent::MarketsLoaded { generation, result }
            }
            FetchRequest::Coin {
                generation,
                id,
                window,
            } => {
                let result = tokio::try_join!(
                    self.coingecko.fetch_coin_detail(&id),
                    self.coingecko.fetch_market_chart(&id, window)
                )
                .map(|(detail, points)| CoinPayload {
                    detail,
                    series: build_series(&points, window),
                });
                if let Err(e) = &result {
                    error!("Failed to fetch coin data for {}: {}", id, e);
                }
                SessionEvent::CoinLoaded { generation, result }
            }
            FetchRequest::News { generation } => {
                let result = self.news.fetch_news().await;
                if let Err(e) = &result {
                    error!("Failed to fetch news articles: {}", e);
                }
                SessionEvent::NewsLoaded { generation, result }
            }
        }
    }
}

/// Main session manager for the interactive terminal
pub struct SessionManager {
    /// Application configuration
    app_config: Config,
    /// CLI arguments
    cli: Cli,
    /// Session state
    state: SessionState,
    /// Session statistics
    stats: SessionStats,
    /// Upstream clients
    fetchers: Fetchers,
    /// Latest task per fetch kind
    in_flight: HashMap<FetchKind, JoinHandle<()>>,
    /// UI task handle (optional)
    ui_task: Option<JoinHandle<()>>,
    /// UI event sender (Session -> UI)
    ui_event_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
    /// Action channel (UI -> Session)
    action_channel: ActionChannel,
}

impl SessionManager {
    /// Create a new SessionManager
    pub fn new(cli: &Cli, app_config: Config) -> Result<Self> {
        info!("Creating new SessionManager");

        let fetchers = Fetchers::from_config(&app_config);

        Ok(Self {
            app_config,
            cli: cli.clone(),
            state: SessionState::Starting,
            stats: SessionStats::default(),
            fetchers,
            in_flight: HashMap::new(),
            ui_task: None,
            ui_event_tx: None,
            action_channel: ActionChannel::new(),
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Route fetch results to `tx` instead of a spawned UI
    pub fn attach_ui_sender(&mut self, tx: mpsc::UnboundedSender<SessionEvent>) {
        self.ui_event_tx = Some(tx);
    }

    /// Sender the UI uses to reach the session
    pub fn session_sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.action_channel.event_tx()
    }

    /// Start the session using the appropriate execution mode
    pub async fn start(&mut self) -> Result<()> {
        if self.cli.is_dry_run_mode() {
            return self.run_dry_run_mode();
        }

        self.initialize()?;
        self.run().await
    }

    fn run_dry_run_mode(&mut self) -> Result<()> {
        info!("Running in dry-run mode - showing welcome page and configuration");

        self.state = SessionState::Running;

        crate::ui::cli::display_welcome_page(&self.app_config);
        println!();
        println!("Dry-run mode configuration:");
        println!("Config file: {}", self.cli.config_file);
        println!("Log level: {}", self.cli.effective_log_level(&self.app_config.log_level));
        self.app_config.display_summary()?;

        self.state = SessionState::Terminated;
        info!("Dry-run mode completed");
        Ok(())
    }

    /// Initialize the session and spawn the UI task
    pub fn initialize(&mut self) -> Result<()> {
        info!("Initializing interactive session");

        let mut ui_manager = UIManager::new(self.action_channel.event_tx(), self.app_config.clone());
        self.attach_ui_sender(ui_manager.ui_event_sender());

        self.ui_task = Some(tokio::spawn(async move {
            if let Err(e) = ui_manager.run().await {
                error!("UI manager error: {}", e);
            }
        }));

        self.state = SessionState::Running;
        info!("Session initialized successfully");
        Ok(())
    }

    /// Run the main session loop
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting interactive session loop");

        while self.state != SessionState::Terminated {
            tokio::select! {
                event = self.action_channel.next_event() => {
                    match event {
                        Some(event) => self.handle_event(event).await?,
                        None => {
                            warn!("Action channel closed");
                            self.shutdown().await;
                        }
                    }
                }

                _ = tokio::time::sleep(Duration::from_millis(100)) => {
                    self.check_ui_task().await;
                }
            }
        }

        info!(
            "Session loop terminated: {} fetches dispatched, {} superseded",
            self.stats.fetches_dispatched, self.stats.fetches_superseded
        );
        Ok(())
    }

    /// Handle a session event
    pub async fn handle_event(&mut self, event: SessionEvent) -> Result<()> {
        self.stats.events_processed += 1;

        match event {
            SessionEvent::FetchRequested(request) => self.dispatch_fetch(request),
            SessionEvent::ShutdownRequested => {
                info!("Received shutdown request");
                self.shutdown().await;
            }
            SessionEvent::Error { message } => {
                self.stats.errors_encountered += 1;
                error!("Session error: {}", message);
            }
            other => {
                warn!("Ignoring UI-bound event on session channel: {:?}", other);
            }
        }

        Ok(())
    }

    /// Spawn a fetch task, aborting any older task of the same kind
    pub fn dispatch_fetch(&mut self, request: FetchRequest) {
        let kind = request.kind();

        if let Some(previous) = self.in_flight.remove(&kind) {
            if !previous.is_finished() {
                previous.abort();
                self.stats.fetches_superseded += 1;
                debug!("Aborted superseded {:?} fetch", kind);
            }
        }

        let Some(ui_tx) = self.ui_event_tx.clone() else {
            warn!("No UI attached, dropping {:?} fetch", kind);
            return;
        };

        debug!(
            "Dispatching {:?} fetch (generation {})",
            kind,
            request.generation()
        );
        self.stats.fetches_dispatched += 1;

        let fetchers = self.fetchers.clone();
        let handle = tokio::spawn(async move {
            let event = fetchers.execute(request).await;
            if ui_tx.send(event).is_err() {
                debug!("UI closed before {:?} fetch result was delivered", kind);
            }
        });

        self.in_flight.insert(kind, handle);
    }

    async fn check_ui_task(&mut self) {
        let finished = self
            .ui_task
            .as_ref()
            .is_some_and(|task| task.is_finished());

        if finished {
            warn!("UI task exited without a shutdown request");
            self.shutdown().await;
        }
    }

    /// Abort in-flight fetches and wait for the UI task
    async fn shutdown(&mut self) {
        if self.state == SessionState::Terminated {
            return;
        }

        self.state = SessionState::ShuttingDown;
        info!("Shutting down session");

        for (kind, handle) in self.in_flight.drain() {
            if !handle.is_finished() {
                debug!("Aborting in-flight {:?} fetch", kind);
                handle.abort();
            }
        }

        if let Some(task) = self.ui_task.take() {
            if let Err(e) = task.await {
                error!("UI task join error: {}", e);
            }
        }

        self.state = SessionState::Terminated;
    }
}
