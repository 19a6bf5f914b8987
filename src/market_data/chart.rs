//! Price chart series derived from market chart data

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::coingecko::PricePoint;

/// Time bucket size requested from the market chart endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Hourly,
    Daily,
    Monthly,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
            Granularity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of days of history requested for a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookbackWindow(u32);

impl LookbackWindow {
    pub const WEEK: Self = Self(7);
    pub const MONTH: Self = Self(30);
    pub const FIVE_YEARS: Self = Self(1825);

    pub fn new(days: u32) -> Self {
        Self(days)
    }

    pub fn days(self) -> u32 {
        self.0
    }

    pub fn granularity(self) -> Granularity {
        match self.0 {
            7 => Granularity::Hourly,
            1825 => Granularity::Monthly,
            _ => Granularity::Daily,
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::WEEK => "Week".to_string(),
            Self::MONTH => "Month".to_string(),
            Self::FIVE_YEARS => "5 Years".to_string(),
            Self(days) => format!("{} days", days),
        }
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self::MONTH
    }
}

/// Fixed styling metadata carried alongside the series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: &'static str,
    pub fill: bool,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub tension: f64,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            label: "Price",
            fill: true,
            border_color: "#1e88e5",
            background_color: "rgba(30, 136, 229, 0.2)",
            tension: 0.4,
        }
    }
}

impl SeriesStyle {
    /// Parse `border_color` as `#rrggbb`
    pub fn border_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.border_color.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Display-ready line series: one label and one value per input point
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub window: LookbackWindow,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(index, price)` pairs for a category-axis line chart
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, price)| (idx as f64, *price))
            .collect()
    }

    /// Lowest and highest price, `None` for an empty series
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |acc, &value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
    }
}

/// Build a series labeled in the viewer's local calendar
pub fn build_series(points: &[PricePoint], window: LookbackWindow) -> ChartSeries {
    build_series_in(points, window, &Local)
}

/// Build a series with labels rendered in `tz`
pub fn build_series_in<Tz>(points: &[PricePoint], window: LookbackWindow, tz: &Tz) -> ChartSeries
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    ChartSeries {
        window,
        labels: points
            .iter()
            .map(|point| format_date_in(point.timestamp_ms, tz))
            .collect(),
        values: points.iter().map(|point| point.price).collect(),
        style: SeriesStyle::default(),
    }
}

/// Local calendar date for a millisecond timestamp
pub fn format_local_date(timestamp_ms: i64) -> String {
    format_date_in(timestamp_ms, &Local)
}

fn format_date_in<Tz>(timestamp_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(utc) => utc.with_timezone(tz).format("%m/%d/%Y").to_string(),
        None => "-".to_string(),
    }
}
