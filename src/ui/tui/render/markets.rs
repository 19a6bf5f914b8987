use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::market_data::{PageView, SortDirection};
use crate::ui::theme::Palette;
use crate::ui::{AppState, LoadState, format_change, format_usd};

use super::render_message;

pub(super) fn render_markets(frame: &mut Frame<'_>, area: Rect, app: &AppState, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    render_controls(frame, chunks[0], app, palette);

    let view = match &app.markets.snapshot {
        LoadState::Loading => {
            render_message(frame, chunks[1], "Loading...", Style::default().fg(palette.muted));
            return;
        }
        LoadState::Failed(message) => {
            render_message(
                frame,
                chunks[1],
                &format!("Failed to load market data: {}", message),
                Style::default().fg(palette.negative),
            );
            return;
        }
        LoadState::Ready(_) => match app.markets.page_view() {
            Some(view) => view,
            None => return,
        },
    };

    if view.is_out_of_range() {
        render_message(
            frame,
            chunks[1],
            &format!(
                "Page {} is empty ({} matching coins on {} pages). Press ← to go back.",
                view.page, view.filtered_len, view.total_pages
            ),
            Style::default().fg(palette.muted),
        );
    } else {
        render_table(frame, chunks[1], &view, app.markets.selected, palette);
    }

    render_pagination(frame, chunks[2], &view, palette);
}

fn render_controls(frame: &mut Frame<'_>, area: Rect, app: &AppState, palette: &Palette) {
    let label = Style::default().fg(palette.muted);
    let sort_text = match app.markets.query.sort {
        Some(order) => format!("{} {}", order.field, order.direction.arrow()),
        None => "none".to_string(),
    };
    let next = match app.markets.sort.pending_direction() {
        SortDirection::Ascending => "Ascending",
        SortDirection::Descending => "Descending",
    };
    let search = if app.markets.query.search_term.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", app.markets.query.search_term)
    };

    let line = Line::from(vec![
        Span::styled(" Crypto Data ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" Sort By: ", label),
        Span::raw(sort_text),
        Span::styled(format!("  (next: {}) ", next), label),
        Span::styled(" [p]rice [c]ap [v]olume ", label),
        Span::styled(" Search: ", label),
        Span::raw(search),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &PageView<'_>,
    selected: usize,
    palette: &Palette,
) {
    let header = Row::new(vec![
        "#", "Name", "Symbol", "Price", "Market Cap", "Volume", "1h", "24h", "7d",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let change_cell = |change: Option<f64>| {
        let style = match change {
            Some(c) if c >= 0.0 => Style::default().fg(palette.positive),
            Some(_) => Style::default().fg(palette.negative),
            None => Style::default().fg(palette.muted),
        };
        Cell::from(format_change(change)).style(style)
    };

    let rows = view.rows.iter().enumerate().map(|(idx, coin)| {
        Row::new(vec![
            Cell::from((idx + 1 + view.first_index).to_string()),
            Cell::from(coin.name.clone()),
            Cell::from(coin.symbol.to_uppercase()),
            Cell::from(format_usd(coin.current_price)),
            Cell::from(format_usd(coin.market_cap)),
            Cell::from(format_usd(coin.total_volume)),
            change_cell(coin.price_change_percentage_1h),
            change_cell(coin.price_change_percentage_24h),
            change_cell(coin.price_change_percentage_7d),
        ])
        .style(Style::default().bg(palette.surface).fg(palette.foreground))
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Min(14),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Length(20),
        Constraint::Length(18),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pagination(frame: &mut Frame<'_>, area: Rect, view: &PageView<'_>, palette: &Palette) {
    let enabled = Style::default().fg(palette.foreground);
    let disabled = Style::default().fg(palette.muted).add_modifier(Modifier::DIM);

    let mut spans = vec![Span::styled(
        "◀ Prev ",
        if view.has_previous() { enabled } else { disabled },
    )];

    for page in 1..=view.total_pages {
        if page == view.page {
            spans.push(Span::styled(
                format!("[{}]", page),
                Style::default()
                    .fg(palette.background)
                    .bg(palette.foreground)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(format!(" {} ", page), enabled));
        }
    }

    spans.push(Span::styled(
        " Next ▶",
        if view.has_next() { enabled } else { disabled },
    ));
    spans.push(Span::styled(
        format!("   {} coins", view.filtered_len),
        Style::default().fg(palette.muted),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
