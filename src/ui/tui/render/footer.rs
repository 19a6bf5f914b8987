use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::theme::Palette;
use crate::ui::ui_manager::RenderState;
use crate::ui::{AppState, InputMode, Route};

pub(super) fn render_footer(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &AppState,
    render_state: &RenderState,
    palette: &Palette,
) {
    let line = match app.input_mode {
        InputMode::Search => prompt_line("Search: ", &app.input_buffer, palette),
        InputMode::Goto => prompt_line("Go to: ", &app.input_buffer, palette),
        InputMode::Normal => status_line(app, render_state, palette),
    };

    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(palette.navbar)),
        ),
        area,
    );
}

fn prompt_line<'a>(label: &'a str, buffer: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(palette.muted)),
        Span::raw(buffer),
        Span::raw("█"),
    ])
}

fn status_line<'a>(app: &'a AppState, render_state: &'a RenderState, palette: &Palette) -> Line<'a> {
    if let Some(status) = &app.status {
        return Line::from(Span::raw(status.as_str()));
    }
    if let Some(error) = &render_state.error_message {
        return Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(palette.negative),
        ));
    }
    if let Some(info) = &render_state.info_message {
        return Line::from(Span::styled(info.as_str(), Style::default().fg(palette.muted)));
    }

    let help = match app.route {
        Route::Markets => "/ search  p/c/v sort  ←/→ page  ↑/↓ select  Enter open",
        Route::Coin(_) => "w week  m month  y 5 years  Esc back",
        Route::News => "↑/↓ select  Enter show link  Esc back",
    };
    Line::from(vec![
        Span::raw(help),
        Span::styled(
            "   t theme  r refresh  : go to  q quit",
            Style::default().fg(palette.muted),
        ),
    ])
}
