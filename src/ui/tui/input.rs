use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::UiAction;
use crate::market_data::{LookbackWindow, SortField};
use crate::ui::{AppState, InputMode, Route};

/// Handle keyboard events for TUI, returning actions for the session manager
pub fn handle_key_event(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    if key_event.kind == KeyEventKind::Release {
        return UiAction::None;
    }

    // Global shortcuts first
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') | KeyCode::Char('d') = key_event.code {
            app.should_quit = true;
            return UiAction::QuitRequested;
        }
        return UiAction::None;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode_keys(app, key_event),
        InputMode::Search | InputMode::Goto => handle_prompt_keys(app, key_event),
    }
}

fn handle_normal_mode_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            UiAction::QuitRequested
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
            UiAction::None
        }
        KeyCode::Char('h') => UiAction::Fetch(app.navigate(Route::Markets)),
        KeyCode::Char('n') => UiAction::Fetch(app.navigate(Route::News)),
        KeyCode::Char('r') => UiAction::Fetch(app.refresh()),
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Goto;
            app.input_buffer.clear();
            UiAction::None
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.open_quick_link(index)
                .map_or(UiAction::None, UiAction::Fetch)
        }
        KeyCode::Esc | KeyCode::Backspace if app.route != Route::Markets => {
            UiAction::Fetch(app.navigate(Route::Markets))
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous();
            UiAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
            UiAction::None
        }
        _ => match app.route {
            Route::Markets => handle_markets_keys(app, key_event),
            Route::Coin(_) => handle_detail_keys(app, key_event),
            Route::News => handle_news_keys(app, key_event),
        },
    }
}

fn handle_markets_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.input_buffer = app.markets.query.search_term.clone();
            UiAction::None
        }
        KeyCode::Char('p') => {
            app.invoke_sort(SortField::Price);
            UiAction::None
        }
        KeyCode::Char('c') => {
            app.invoke_sort(SortField::MarketCap);
            UiAction::None
        }
        KeyCode::Char('v') => {
            app.invoke_sort(SortField::Volume);
            UiAction::None
        }
        KeyCode::Left | KeyCode::Char('[') => {
            app.previous_page();
            UiAction::None
        }
        KeyCode::Right | KeyCode::Char(']') => {
            app.next_page();
            UiAction::None
        }
        KeyCode::Enter => match app.markets.selected_coin_id() {
            Some(id) => UiAction::Fetch(app.navigate(Route::Coin(id))),
            None => UiAction::None,
        },
        _ => UiAction::None,
    }
}

fn handle_detail_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    let window = match key_event.code {
        KeyCode::Char('w') => LookbackWindow::WEEK,
        KeyCode::Char('m') => LookbackWindow::MONTH,
        KeyCode::Char('y') => LookbackWindow::FIVE_YEARS,
        _ => return UiAction::None,
    };

    app.set_lookback(window).map_or(UiAction::None, UiAction::Fetch)
}

fn handle_news_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    if key_event.code == KeyCode::Enter {
        if let Some(article) = app.news.selected_article() {
            app.status = Some(format!("{} ({})", article.url, article.source));
        }
    }
    UiAction::None
}

fn handle_prompt_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.input_buffer.clear();
            UiAction::None
        }
        KeyCode::Enter => match app.input_mode {
            InputMode::Search => {
                app.submit_search();
                UiAction::None
            }
            _ => {
                let path = std::mem::take(&mut app.input_buffer);
                app.input_mode = InputMode::Normal;
                app.navigate_path(&path)
                    .map_or(UiAction::None, UiAction::Fetch)
            }
        },
        KeyCode::Backspace => {
            app.input_buffer.pop();
            UiAction::None
        }
        KeyCode::Char(c) => {
            app.input_buffer.push(c);
            UiAction::None
        }
        _ => UiAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coingecko::CoinSummary;
    use crate::config::Config;
    use crate::market_data::SortDirection;
    use crate::session::{FetchRequest, SessionEvent};

    fn press(app: &mut AppState, code: KeyCode) -> UiAction {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn loaded_app() -> AppState {
        let mut app = AppState::new(&Config::default());
        let FetchRequest::Markets { generation } = app.navigate(Route::Markets) else {
            panic!("expected markets request");
        };
        let mut btc = CoinSummary::new("a", "Bitcoin", "btc");
        btc.current_price = 100.0;
        let mut eth = CoinSummary::new("b", "Ether", "eth");
        eth.current_price = 50.0;
        app.apply_event(SessionEvent::MarketsLoaded {
            generation,
            result: Ok(vec![btc, eth]),
        });
        app
    }

    #[test]
    fn test_search_prompt_applies_on_enter() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        type_text(&mut app, "eth");
        // Not applied until submitted
        assert_eq!(app.markets.page_view().unwrap().rows.len(), 2);

        press(&mut app, KeyCode::Enter);
        let view = app.markets.page_view().unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, "b");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_whitespace_search_term_is_kept() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, " ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.markets.query.search_term, " ");
        // No name or symbol contains a space
        assert!(app.markets.page_view().unwrap().rows.is_empty());
    }

    #[test]
    fn test_sort_key_toggles_direction() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.markets.query.sort.unwrap().direction, SortDirection::Ascending);
        assert_eq!(app.markets.selected_coin_id().as_deref(), Some("b"));

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.markets.query.sort.unwrap().direction, SortDirection::Descending);
        assert_eq!(app.markets.selected_coin_id().as_deref(), Some("a"));
    }

    #[test]
    fn test_enter_opens_selected_coin() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Down);
        match press(&mut app, KeyCode::Enter) {
            UiAction::Fetch(FetchRequest::Coin { id, .. }) => assert_eq!(id, "b"),
            other => panic!("unexpected action: {:?}", other),
        }
        assert_eq!(app.route, Route::Coin("b".to_string()));

        assert!(matches!(press(&mut app, KeyCode::Char('w')), UiAction::Fetch(_)));
        assert!(matches!(press(&mut app, KeyCode::Esc), UiAction::Fetch(FetchRequest::Markets { .. })));
    }

    #[test]
    fn test_goto_prompt_and_quick_links() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char(':'));
        type_text(&mut app, "/news");
        assert!(matches!(press(&mut app, KeyCode::Enter), UiAction::Fetch(FetchRequest::News { .. })));
        assert_eq!(app.route, Route::News);

        match press(&mut app, KeyCode::Char('2')) {
            UiAction::Fetch(FetchRequest::Coin { id, .. }) => assert_eq!(id, "ethereum"),
            other => panic!("unexpected action: {:?}", other),
        }
        assert_eq!(press(&mut app, KeyCode::Char('9')), UiAction::None);
    }

    #[test]
    fn test_quit_and_theme_keys() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('t'));
        assert!(app.theme_mode().is_dark());

        let action = handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert_eq!(action, UiAction::QuitRequested);
        assert!(app.should_quit);
    }
}
