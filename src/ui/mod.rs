//! User Interface module
//!
//! Provides both TUI (Terminal User Interface) and simple CLI output capabilities.

/// TUI application state and rendering
pub mod tui;

/// Simple CLI output functions
pub mod cli;

/// Light/dark theme store
pub mod theme;

/// Terminal loop driving the TUI
pub mod ui_manager;

use std::fmt;

use tracing::debug;

use crate::coingecko::CoinSummary;
use crate::config::Config;
use crate::market_data::{self, ListQuery, LookbackWindow, PageView, SortField, SortState};
use crate::news::NewsArticle;
use crate::session::{CoinPayload, FetchRequest, Generation, GenerationTracker, SessionEvent};

use self::theme::{ThemeMode, ThemeReader, ThemeStore};

/// Client-side routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Markets,
    Coin(String),
    News,
}

impl Route {
    /// Parse `/`, `/news` or `/coin/<id>`
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        match path.trim_end_matches('/') {
            "" => Some(Route::Markets),
            "/news" => Some(Route::News),
            other => {
                let id = other.strip_prefix("/coin/")?;
                if id.is_empty() || id.contains('/') {
                    None
                } else {
                    Some(Route::Coin(id.to_string()))
                }
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Markets => "/".to_string(),
            Route::Coin(id) => format!("/coin/{}", id),
            Route::News => "/news".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Fetch-backed value held by a view
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }
}

/// Input focus of the terminal UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Goto,
}

/// Market list view state
#[derive(Debug, Clone)]
pub struct MarketsView {
    pub snapshot: LoadState<Vec<CoinSummary>>,
    pub query: ListQuery,
    pub sort: SortState,
    pub selected: usize,
    tracker: GenerationTracker,
}

impl MarketsView {
    fn new(page_size: usize, sort: SortState) -> Self {
        Self {
            snapshot: LoadState::Loading,
            query: ListQuery::new(page_size),
            sort,
            selected: 0,
            tracker: GenerationTracker::new(),
        }
    }

    /// Reset local state and request a fresh snapshot
    fn mount(&mut self) -> FetchRequest {
        self.snapshot = LoadState::Loading;
        self.query = ListQuery::new(self.query.page_size);
        self.sort = SortState::new(self.sort.policy());
        self.selected = 0;
        FetchRequest::Markets {
            generation: self.tracker.issue(),
        }
    }

    fn apply(&mut self, generation: Generation, snapshot: LoadState<Vec<CoinSummary>>) -> bool {
        if !self.tracker.is_current(generation) {
            debug!("Discarding stale market snapshot (generation {})", generation);
            return false;
        }
        self.snapshot = snapshot;
        self.selected = 0;
        true
    }

    /// Rows visible under the current query
    pub fn page_view(&self) -> Option<PageView<'_>> {
        self.snapshot
            .ready()
            .map(|snapshot| market_data::apply(snapshot, &self.query))
    }

    pub fn selected_coin_id(&self) -> Option<String> {
        let view = self.page_view()?;
        view.rows.get(self.selected).map(|coin| coin.id.clone())
    }

    fn visible_len(&self) -> usize {
        self.page_view().map_or(0, |view| view.rows.len())
    }
}

/// Coin detail view state
#[derive(Debug, Clone)]
pub struct DetailView {
    pub coin_id: Option<String>,
    pub window: LookbackWindow,
    pub payload: LoadState<CoinPayload>,
    tracker: GenerationTracker,
}

impl DetailView {
    fn new(window: LookbackWindow) -> Self {
        Self {
            coin_id: None,
            window,
            payload: LoadState::Loading,
            tracker: GenerationTracker::new(),
        }
    }

    fn mount(&mut self, id: String, window: LookbackWindow) -> FetchRequest {
        self.coin_id = Some(id);
        self.window = window;
        self.request()
    }

    fn request(&mut self) -> FetchRequest {
        self.payload = LoadState::Loading;
        FetchRequest::Coin {
            generation: self.tracker.issue(),
            id: self.coin_id.clone().unwrap_or_default(),
            window: self.window,
        }
    }

    fn apply(&mut self, generation: Generation, payload: LoadState<CoinPayload>) -> bool {
        if !self.tracker.is_current(generation) {
            debug!("Discarding stale coin data (generation {})", generation);
            return false;
        }
        self.payload = payload;
        true
    }
}

/// News list view state
#[derive(Debug, Clone)]
pub struct NewsView {
    pub articles: LoadState<Vec<NewsArticle>>,
    pub selected: usize,
    tracker: GenerationTracker,
}

impl NewsView {
    fn new() -> Self {
        Self {
            articles: LoadState::Loading,
            selected: 0,
            tracker: GenerationTracker::new(),
        }
    }

    fn mount(&mut self) -> FetchRequest {
        self.articles = LoadState::Loading;
        self.selected = 0;
        FetchRequest::News {
            generation: self.tracker.issue(),
        }
    }

    fn apply(&mut self, generation: Generation, articles: LoadState<Vec<NewsArticle>>) -> bool {
        if !self.tracker.is_current(generation) {
            debug!("Discarding stale news (generation {})", generation);
            return false;
        }
        self.articles = articles;
        self.selected = 0;
        true
    }

    pub fn selected_article(&self) -> Option<&NewsArticle> {
        self.articles.ready()?.get(self.selected)
    }
}

/// Application state for UI components
#[derive(Debug)]
pub struct AppState {
    pub should_quit: bool,
    pub route: Route,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub status: Option<String>,
    pub quick_links: Vec<String>,
    pub markets: MarketsView,
    pub detail: DetailView,
    pub news: NewsView,
    default_window: LookbackWindow,
    theme: ThemeStore,
    theme_reader: ThemeReader,
}

impl AppState {
    /// Create new application state
    pub fn new(config: &Config) -> Self {
        let theme = ThemeStore::new(ThemeMode::from_dark_flag(config.ui.dark_mode));
        let theme_reader = theme.subscribe();
        let default_window = LookbackWindow::new(config.default_lookback_days);

        Self {
            should_quit: false,
            route: Route::Markets,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            status: None,
            quick_links: config.ui.quick_links.clone(),
            markets: MarketsView::new(config.page_size, SortState::new(config.sort_policy)),
            detail: DetailView::new(default_window),
            news: NewsView::new(),
            default_window,
            theme,
            theme_reader,
        }
    }

    /// Switch route and mount its view
    pub fn navigate(&mut self, route: Route) -> FetchRequest {
        debug!("Navigating to {}", route);
        // Coin to coin keeps the detail view mounted, so its window carries over
        let window = match self.route {
            Route::Coin(_) => self.detail.window,
            _ => self.default_window,
        };
        self.route = route.clone();
        self.status = None;
        match route {
            Route::Markets => self.markets.mount(),
            Route::Coin(id) => self.detail.mount(id, window),
            Route::News => self.news.mount(),
        }
    }

    /// Navigate to a path typed by the user
    pub fn navigate_path(&mut self, path: &str) -> Option<FetchRequest> {
        match Route::from_path(path) {
            Some(route) => Some(self.navigate(route)),
            None => {
                self.status = Some(format!("Unknown route: {}", path));
                None
            }
        }
    }

    /// Re-issue the current view's fetch without resetting its local state
    pub fn refresh(&mut self) -> FetchRequest {
        match self.route {
            Route::Markets => {
                self.markets.snapshot = LoadState::Loading;
                FetchRequest::Markets {
                    generation: self.markets.tracker.issue(),
                }
            }
            Route::Coin(_) => self.detail.request(),
            Route::News => self.news.mount(),
        }
    }

    /// Open the quick link at `index` (0-based)
    pub fn open_quick_link(&mut self, index: usize) -> Option<FetchRequest> {
        let id = self.quick_links.get(index)?.clone();
        Some(self.navigate(Route::Coin(id)))
    }

    /// Apply a fetch result; returns false when it was stale
    pub fn apply_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::MarketsLoaded { generation, result } => {
                self.markets.apply(generation, LoadState::from_result(result))
            }
            SessionEvent::CoinLoaded { generation, result } => {
                self.detail.apply(generation, LoadState::from_result(result))
            }
            SessionEvent::NewsLoaded { generation, result } => {
                self.news.apply(generation, LoadState::from_result(result))
            }
            SessionEvent::Error { message } => {
                self.status = Some(message);
                true
            }
            _ => false,
        }
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_reader.current()
    }

    pub fn theme_reader(&self) -> ThemeReader {
        self.theme.subscribe()
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme.toggle()
    }

    /// Sort the market list by `field` through the sort state machine
    pub fn invoke_sort(&mut self, field: SortField) {
        let order = self.markets.sort.invoke(field);
        self.markets.query.sort = Some(order);
        self.markets.selected = 0;
    }

    /// Apply the typed search term; the page index is left as is
    pub fn submit_search(&mut self) {
        self.markets.query.search_term = self.input_buffer.clone();
        self.markets.selected = 0;
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn next_page(&mut self) {
        if self.markets.page_view().is_some_and(|view| view.has_next()) {
            self.markets.query.page += 1;
            self.markets.selected = 0;
        }
    }

    pub fn previous_page(&mut self) {
        if self.markets.query.page > 1 {
            self.markets.query.page -= 1;
            self.markets.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        match self.route {
            Route::Markets => {
                let len = self.markets.visible_len();
                if len > 0 {
                    self.markets.selected = (self.markets.selected + 1).min(len - 1);
                }
            }
            Route::News => {
                let len = self.news.articles.ready().map_or(0, Vec::len);
                if len > 0 {
                    self.news.selected = (self.news.selected + 1).min(len - 1);
                }
            }
            Route::Coin(_) => {}
        }
    }

    pub fn select_previous(&mut self) {
        match self.route {
            Route::Markets => self.markets.selected = self.markets.selected.saturating_sub(1),
            Route::News => self.news.selected = self.news.selected.saturating_sub(1),
            Route::Coin(_) => {}
        }
    }

    /// Change the chart window; `None` when it is already selected
    pub fn set_lookback(&mut self, window: LookbackWindow) -> Option<FetchRequest> {
        if !matches!(self.route, Route::Coin(_)) || self.detail.window == window {
            return None;
        }
        self.detail.window = window;
        Some(self.detail.request())
    }
}

/// `$1,234.56`-style formatting for prices and totals
pub fn format_usd(value: f64) -> String {
    let decimals = if value.abs() >= 1.0 || value == 0.0 {
        2
    } else {
        6
    };
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{}", sign, grouped, fraction)
    }
}

/// `+1.23%` or `-` when upstream omitted the change
pub fn format_change(change: Option<f64>) -> String {
    change.map_or_else(|| "-".to_string(), |c| format!("{:+.2}%", c))
}
