//! Simple CLI output implementation
//!
//! Provides one-shot command-line output for the market list, a single coin
//! and the news feed.

use colored::{ColoredString, Colorize};

use super::{format_change, format_usd};
use crate::AppResult;
use crate::config::Config;
use crate::market_data::{
    self, ListQuery, LookbackWindow, PageView, SortDirection, SortField, SortOrder,
    build_series, format_local_date,
};
use crate::session::Fetchers;

/// Options for the one-shot market list
#[derive(Debug, Clone)]
pub struct MarketsOptions {
    pub search: Option<String>,
    pub sort: Option<SortField>,
    pub descending: bool,
    pub page: usize,
    pub page_size: Option<usize>,
}

/// Display the welcome banner shown in dry-run mode
pub fn display_welcome_page(config: &Config) {
    println!();
    println!("┌─ CoinView Crypto Market Browser ────────────────────────────────────┐");
    println!("│                                                                     │");
    println!("│   {:<65} │", format!("Version {}", env!("CARGO_PKG_VERSION")));
    println!("│   {:<65} │", format!("Quick links: {}", config.ui.quick_links.join(", ")));
    println!(
        "│   {:<65} │",
        format!("Theme: {}", if config.ui.dark_mode { "dark" } else { "light" })
    );
    println!("│                                                                     │");
    println!("│   Keys:                                                             │");
    println!("│   • / search, p/c/v sort, ←/→ page, Enter open coin                 │");
    println!("│   • h home, n news, : go to path, 1-9 quick links                   │");
    println!("│   • w/m/y chart window, t theme, r refresh, q quit                  │");
    println!("│                                                                     │");
    println!("└─────────────────────────────────────────────────────────────────────┘");
}

fn colored_change(change: Option<f64>) -> ColoredString {
    let text = format_change(change);
    match change {
        Some(c) if c >= 0.0 => text.green(),
        Some(_) => text.red(),
        None => text.dimmed(),
    }
}

/// Fetch the snapshot and print one page of the list
pub async fn run_markets(config: &Config, options: MarketsOptions) -> AppResult<()> {
    let fetchers = Fetchers::from_config(config);
    let coins = fetchers.coingecko.fetch_markets().await?;

    let mut query = ListQuery::new(options.page_size.unwrap_or(config.page_size));
    query.search_term = options.search.unwrap_or_default();
    query.page = options.page;
    query.sort = options.sort.map(|field| {
        let direction = if options.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        SortOrder::new(field, direction)
    });

    let view = market_data::apply(&coins, &query);
    display_market_page(&view, &query);
    Ok(())
}

/// Print a page of the list as a table
pub fn display_market_page(view: &PageView<'_>, query: &ListQuery) {
    let sort = query.sort.map_or_else(
        || "none".to_string(),
        |order| format!("{} {}", order.field, order.direction.arrow()),
    );
    println!(
        "{} (sort: {}, search: {})",
        "📊 Crypto Data".bold(),
        sort,
        if query.search_term.is_empty() {
            "-"
        } else {
            query.search_term.as_str()
        }
    );

    if view.is_out_of_range() {
        println!(
            "   Page {} is empty ({} matching coins on {} pages)",
            view.page, view.filtered_len, view.total_pages
        );
        return;
    }

    println!(
        "{:>4}  {:<20} {:<7} {:>16} {:>20} {:>18} {:>8} {:>8} {:>8}",
        "#", "Name", "Symbol", "Price", "Market Cap", "Volume", "1h", "24h", "7d"
    );
    for (idx, coin) in view.rows.iter().enumerate() {
        println!(
            "{:>4}  {:<20} {:<7} {:>16} {:>20} {:>18} {:>8} {:>8} {:>8}",
            view.first_index + idx + 1,
            coin.name,
            coin.symbol.to_uppercase(),
            format_usd(coin.current_price),
            format_usd(coin.market_cap),
            format_usd(coin.total_volume),
            colored_change(coin.price_change_percentage_1h),
            colored_change(coin.price_change_percentage_24h),
            colored_change(coin.price_change_percentage_7d),
        );
    }
    println!(
        "   Page {} of {} ({} coins)",
        view.page, view.total_pages, view.filtered_len
    );
}

/// Fetch and print detail stats plus a chart summary
pub async fn run_coin(config: &Config, id: &str, days: Option<u32>) -> AppResult<()> {
    let fetchers = Fetchers::from_config(config);
    let window = LookbackWindow::new(days.unwrap_or(config.default_lookback_days));

    let (detail, points) = tokio::try_join!(
        fetchers.coingecko.fetch_coin_detail(id),
        fetchers.coingecko.fetch_market_chart(id, window)
    )?;
    let series = build_series(&points, window);

    println!(
        "📊 {} ({})",
        detail.name.bold(),
        detail.symbol.to_uppercase()
    );
    println!("   Price: {}", format_usd(detail.current_price));
    println!("   24h High: {}", format_usd(detail.high_24h));
    println!("   24h Low:  {}", format_usd(detail.low_24h));
    println!("   Market Cap: {}", format_usd(detail.market_cap));
    println!("   Volume: {}", format_usd(detail.total_volume));

    println!(
        "   Chart: {} ({} granularity, {} points)",
        window.label(),
        window.granularity(),
        series.len()
    );
    if let (Some((low, high)), Some(first), Some(last)) = (
        series.price_bounds(),
        series.labels.first(),
        series.labels.last(),
    ) {
        println!("   Range: {} → {}", first, last);
        println!("   Low/High: {} / {}", format_usd(low), format_usd(high));
    }

    Ok(())
}

/// Fetch and print the latest articles
pub async fn run_news(config: &Config, limit: usize) -> AppResult<()> {
    let fetchers = Fetchers::from_config(config);
    let articles = fetchers.news.fetch_news().await?;

    println!("{}", "📰 Latest Crypto News".bold());
    if articles.is_empty() {
        println!("   (No articles)");
    }
    for (i, article) in articles.iter().take(limit).enumerate() {
        println!("   {}. {}", i + 1, article.title.bold());
        println!(
            "      {} · {}",
            format_local_date(article.published_on.saturating_mul(1000)),
            article.source
        );
        println!("      {}", article.url.dimmed());
    }

    Ok(())
}
