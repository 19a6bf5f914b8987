use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use crate::market_data::{ChartSeries, LookbackWindow};
use crate::session::CoinPayload;
use crate::ui::theme::Palette;
use crate::ui::{AppState, LoadState, format_usd};

use super::render_message;

pub(super) fn render_coin_detail(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &AppState,
    id: &str,
    palette: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(6),
        ])
        .split(area);

    let payload = match &app.detail.payload {
        LoadState::Loading => {
            render_message(
                frame,
                area,
                &format!("Loading {}...", id),
                Style::default().fg(palette.muted),
            );
            return;
        }
        LoadState::Failed(message) => {
            render_message(
                frame,
                area,
                &format!("Failed to load {}: {}", id, message),
                Style::default().fg(palette.negative),
            );
            return;
        }
        LoadState::Ready(payload) => payload,
    };

    render_stats(frame, chunks[0], payload, palette);
    render_window_buttons(frame, chunks[1], app.detail.window, palette);
    render_chart(frame, chunks[2], &payload.series, palette);
}

fn render_stats(frame: &mut Frame<'_>, area: Rect, payload: &CoinPayload, palette: &Palette) {
    let detail = &payload.detail;
    let label = Style::default().fg(palette.muted);

    let lines = vec![
        Line::from(vec![
            Span::styled("Price: ", label),
            Span::styled(
                format_usd(detail.current_price),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("   24h High: ", label),
            Span::raw(format_usd(detail.high_24h)),
            Span::styled("   24h Low: ", label),
            Span::raw(format_usd(detail.low_24h)),
        ]),
        Line::from(vec![
            Span::styled("Market Cap: ", label),
            Span::raw(format_usd(detail.market_cap)),
            Span::styled("   Volume: ", label),
            Span::raw(format_usd(detail.total_volume)),
        ]),
    ];

    let title = format!(" {} ({}) ", detail.name, detail.symbol.to_uppercase());
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().bg(palette.surface)),
        ),
        area,
    );
}

fn render_window_buttons(
    frame: &mut Frame<'_>,
    area: Rect,
    current: LookbackWindow,
    palette: &Palette,
) {
    let buttons = [
        ('w', LookbackWindow::WEEK),
        ('m', LookbackWindow::MONTH),
        ('y', LookbackWindow::FIVE_YEARS),
    ];

    let mut spans = Vec::with_capacity(buttons.len() * 2);
    for (key, window) in buttons {
        let style = if window == current {
            Style::default()
                .bg(palette.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(palette.control)
        };
        spans.push(Span::styled(format!(" [{}] {} ", key, window.label()), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn render_chart(frame: &mut Frame<'_>, area: Rect, series: &ChartSeries, palette: &Palette) {
    let Some((min_price, max_price)) = series.price_bounds() else {
        render_message(
            frame,
            area,
            "No price history for this window",
            Style::default().fg(palette.muted),
        );
        return;
    };

    let (mut low, mut high) = (min_price, max_price);
    if (high - low).abs() < f64::EPSILON {
        high = low + 1.0;
    } else {
        let padding = (high - low) * 0.05;
        low -= padding;
        high += padding;
    }

    let points = series.points();
    let line_color = series
        .style
        .border_rgb()
        .map_or(Color::Blue, |(r, g, b)| Color::Rgb(r, g, b));

    let dataset = Dataset::default()
        .name(series.style.label)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(line_color))
        .data(&points);

    let last = series.len().saturating_sub(1);
    let x_labels: Vec<Span> = [0, last / 2, last]
        .iter()
        .filter_map(|&idx| series.labels.get(idx))
        .map(|label| Span::styled(label.clone(), Style::default().fg(palette.muted)))
        .collect();
    let y_labels: Vec<Span> = [low, (low + high) / 2.0, high]
        .iter()
        .map(|price| Span::styled(format_usd(*price), Style::default().fg(palette.muted)))
        .collect();

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", series.window.label())),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, last.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(Axis::default().bounds([low, high]).labels(y_labels));

    frame.render_widget(chart, area);
}
