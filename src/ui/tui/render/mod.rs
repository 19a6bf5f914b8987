mod coin_detail;
mod footer;
mod markets;
mod navbar;
mod news;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::theme::Palette;
use crate::ui::ui_manager::RenderState;
use crate::ui::{AppState, Route};

use self::coin_detail::render_coin_detail;
use self::footer::render_footer;
use self::markets::render_markets;
use self::navbar::render_navbar;
use self::news::render_news;

pub(super) fn render_root(frame: &mut Frame<'_>, app: &AppState, render_state: &RenderState) {
    let palette = Palette::for_mode(app.theme_mode());

    frame.render_widget(
        Block::default().style(
            Style::default()
                .bg(palette.background)
                .fg(palette.foreground),
        ),
        frame.size(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.size());

    render_navbar(frame, chunks[0], app, &palette);

    match &app.route {
        Route::Markets => render_markets(frame, chunks[1], app, &palette),
        Route::Coin(id) => render_coin_detail(frame, chunks[1], app, id, &palette),
        Route::News => render_news(frame, chunks[1], app, &palette),
    }

    render_footer(frame, chunks[2], app, render_state, &palette);
}

/// Centered one-line state message (loading, error, empty)
fn render_message(frame: &mut Frame<'_>, area: Rect, message: &str, style: Style) {
    frame.render_widget(
        Paragraph::new(message.to_string())
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}
