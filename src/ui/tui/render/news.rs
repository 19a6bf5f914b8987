use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::market_data::format_local_date;
use crate::ui::theme::Palette;
use crate::ui::{AppState, LoadState};

use super::render_message;

pub(super) fn render_news(frame: &mut Frame<'_>, area: Rect, app: &AppState, palette: &Palette) {
    let articles = match &app.news.articles {
        LoadState::Loading => {
            render_message(frame, area, "Loading news...", Style::default().fg(palette.muted));
            return;
        }
        LoadState::Failed(message) => {
            render_message(
                frame,
                area,
                &format!("Failed to load news: {}", message),
                Style::default().fg(palette.negative),
            );
            return;
        }
        LoadState::Ready(articles) => articles,
    };

    if articles.is_empty() {
        render_message(frame, area, "No news articles", Style::default().fg(palette.muted));
        return;
    }

    let items: Vec<ListItem> = articles
        .iter()
        .map(|article| {
            // CryptoCompare timestamps are in seconds
            let published = format_local_date(article.published_on.saturating_mul(1000));
            ListItem::new(vec![
                Line::from(Span::styled(
                    article.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {} · {}", published, article.source),
                    Style::default().fg(palette.muted),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Latest Crypto News ")
                .style(Style::default().bg(palette.surface)),
        )
        .highlight_style(Style::default().bg(palette.highlight))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.news.selected));
    frame.render_stateful_widget(list, area, &mut state);
}
