use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::theme::Palette;
use crate::ui::{AppState, Route};

pub(super) fn render_navbar(frame: &mut Frame<'_>, area: Rect, app: &AppState, palette: &Palette) {
    let base = Style::default().bg(palette.navbar).fg(palette.foreground);
    let active = base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let link = |label: &'static str, selected: bool| {
        Span::styled(label, if selected { active } else { base })
    };

    let mut spans = vec![
        Span::styled(" CoinMarketCap ", base.add_modifier(Modifier::BOLD)),
        Span::styled("│ ", base),
        link("[h] Home", app.route == Route::Markets),
        Span::styled("  ", base),
        link("[n] News", app.route == Route::News),
        Span::styled("  │ ", base),
    ];

    for (idx, id) in app.quick_links.iter().take(9).enumerate() {
        let selected = matches!(&app.route, Route::Coin(current) if current == id);
        spans.push(Span::styled(
            format!("[{}] {} ", idx + 1, id),
            if selected { active } else { base.bg(palette.control) },
        ));
        spans.push(Span::styled(" ", base));
    }

    spans.push(Span::styled("│ ", base));
    spans.push(Span::styled(
        format!("[t] {} ", app.theme_mode().toggle_icon()),
        base,
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.route))
        .style(base);

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
