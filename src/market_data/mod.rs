//! Market data processing module
//!
//! Pure transforms between fetched payloads and what the views render: the
//! list pipeline (search, sort, paginate) and the price chart series.

pub mod chart;
pub mod pipeline;

pub use chart::{
    ChartSeries, Granularity, LookbackWindow, SeriesStyle, build_series, build_series_in,
    format_local_date,
};
pub use pipeline::{
    DEFAULT_PAGE_SIZE, ListQuery, PageView, SortDirection, SortField, SortOrder, SortPolicy,
    SortState, apply, filter, paginate, sort_rows, total_pages,
};
