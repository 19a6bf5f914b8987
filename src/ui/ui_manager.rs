//! UI Manager for interactive terminal interface

use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crossterm::event::{self, Event};

use crate::config::Config;
use crate::session::SessionEvent;

use super::tui::{Tui, UiAction, handle_key_event};
use super::{AppState, Route};

/// UI Manager for managing the terminal interface
pub struct UIManager {
    /// Event sender for session events (UI -> Session)
    session_event_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Event sender for UI events (Session -> UI)
    ui_event_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Event receiver for UI events
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    /// Application state
    app_state: AppState,
    /// UI rendering state
    render_state: RenderState,
    /// TUI terminal handle
    tui: Option<Tui>,
    /// Desired refresh cadence
    refresh_interval: Duration,
    /// Time of the last successful render
    last_render: Instant,
}

/// UI rendering state
#[derive(Debug, Clone)]
pub struct RenderState {
    pub should_quit: bool,
    pub should_redraw: bool,
    pub render_count: u64,
    pub error_message: Option<String>,
    pub info_message: Option<String>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            should_quit: false,
            should_redraw: true,
            render_count: 0,
            error_message: None,
            info_message: None,
        }
    }
}

impl UIManager {
    /// Create a new UIManager
    pub fn new(session_event_tx: mpsc::UnboundedSender<SessionEvent>, config: Config) -> Self {
        let (ui_event_tx, event_rx) = mpsc::unbounded_channel();
        let refresh_interval = Duration::from_millis(config.ui.refresh_rate_ms.clamp(16, 1000));

        Self {
            session_event_tx,
            ui_event_tx,
            event_rx,
            app_state: AppState::new(&config),
            render_state: RenderState::default(),
            tui: None,
            refresh_interval,
            last_render: Instant::now(),
        }
    }

    /// Get UI event sender (Session -> UI)
    pub fn ui_event_sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.ui_event_tx.clone()
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    /// Run the UI manager
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting UI manager");

        self.spawn_background_watchers();

        // Land on the market list like a fresh page load
        let initial = self.app_state.navigate(Route::Markets);
        self.request_fetch(SessionEvent::FetchRequested(initial));

        self.run_ui_loop().await?;

        info!("UI manager stopped");
        Ok(())
    }

    fn spawn_background_watchers(&self) {
        let ui_shutdown_tx = self.ui_event_tx.clone();
        let session_shutdown_tx = self.session_event_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }

            tracing::info!("Ctrl+C received, initiating shutdown");
            let _ = ui_shutdown_tx.send(SessionEvent::ShutdownRequested);
            let _ = session_shutdown_tx.send(SessionEvent::ShutdownRequested);
        });

        let mut theme_reader = self.app_state.theme_reader();
        tokio::spawn(async move {
            while let Some(mode) = theme_reader.changed().await {
                info!("Theme switched to {:?}", mode);
            }
        });
    }

    /// Main UI rendering loop
    async fn run_ui_loop(&mut self) -> Result<()> {
        info!("Starting UI rendering loop");

        self.tui =
            Some(Tui::new().map_err(|e| anyhow::anyhow!("Failed to initialise terminal: {}", e))?);
        self.render_state.should_redraw = true;
        self.last_render = Instant::now()
            .checked_sub(self.refresh_interval)
            .unwrap_or_else(Instant::now);

        while !self.render_state.should_quit && !self.app_state.should_quit {
            // Process fetch results from the session layer
            self.process_events();

            // Handle terminal input (non-blocking)
            self.poll_terminal_events()?;

            // Render on dirty state or cadence tick
            let now = Instant::now();
            if self.render_state.should_redraw
                || now.duration_since(self.last_render) >= self.refresh_interval
            {
                if let Some(tui) = self.tui.as_mut() {
                    self.render_state.render_count += 1;
                    tui.draw(&self.app_state, &self.render_state)
                        .map_err(|e| anyhow::anyhow!("Failed to render frame: {}", e))?;
                }
                self.render_state.should_redraw = false;
                self.last_render = now;
            }

            // Prevent busy loop
            tokio::time::sleep(Duration::from_millis(16)).await;
        }

        if let Some(tui) = self.tui.as_mut() {
            tui.restore()
                .map_err(|e| anyhow::anyhow!("Failed to restore terminal state: {}", e))?;
        }

        Ok(())
    }

    /// Poll for keyboard/terminal events and translate into session actions
    fn poll_terminal_events(&mut self) -> Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => {
                    let action = handle_key_event(&mut self.app_state, key_event);
                    self.render_state.should_redraw = true;
                    self.handle_action(action);
                }
                Event::Resize(_, _) => {
                    self.render_state.should_redraw = true;
                }
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        if self.app_state.should_quit {
            self.render_state.should_quit = true;
        }

        Ok(())
    }

    /// Forward a key action to the session layer
    pub fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::None => {}
            UiAction::Fetch(request) => {
                self.render_state.error_message = None;
                self.request_fetch(SessionEvent::FetchRequested(request));
            }
            UiAction::QuitRequested => {
                info!("User requested quit");
                self.render_state.should_quit = true;
                let _ = self.session_event_tx.send(SessionEvent::ShutdownRequested);
            }
        }
    }

    fn request_fetch(&mut self, event: SessionEvent) {
        if self.session_event_tx.send(event).is_err() {
            self.render_state.error_message =
                Some("Session closed, unable to fetch data".to_string());
        }
    }

    /// Drain pending session events without blocking
    pub fn process_events(&mut self) {
        let mut processed = false;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            processed = true;
        }

        if processed {
            self.render_state.should_redraw = true;
        }
    }

    /// Handle session event
    pub fn handle_event(&mut self, event: SessionEvent) {
        debug!("Handling UI event: {:?}", event);

        match event {
            SessionEvent::ShutdownRequested => {
                self.render_state.info_message =
                    Some("Shutdown requested. Exiting interactive session...".to_string());
                self.render_state.should_quit = true;
                info!("UI received shutdown request");
            }
            SessionEvent::Error { message } => {
                self.render_state.error_message = Some(format!("Error: {}", message));
            }
            event => {
                if !self.app_state.apply_event(event) {
                    debug!("Dropped stale fetch result");
                }
            }
        }
    }
}
