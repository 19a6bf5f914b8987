//! Search, sort and pagination over a market snapshot
//!
//! The pipeline borrows the snapshot and never mutates it; every stage
//! returns a new sequence of references into it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::coingecko::CoinSummary;

/// Rows per page used by the market list
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Numeric column a snapshot can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Price,
    MarketCap,
    Volume,
}

impl SortField {
    pub fn key(self, coin: &CoinSummary) -> f64 {
        match self {
            SortField::Price => coin.current_price,
            SortField::MarketCap => coin.market_cap,
            SortField::Volume => coin.total_volume,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::Price => "Price",
            SortField::MarketCap => "Market Cap",
            SortField::Volume => "Volume",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(SortField::Price),
            "market-cap" | "market_cap" | "marketcap" | "cap" => Ok(SortField::MarketCap),
            "volume" | "vol" => Ok(SortField::Volume),
            other => Err(format!(
                "unknown sort field '{}' (expected price, market-cap or volume)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// A concrete sort: one field, one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    fn compare(&self, a: &CoinSummary, b: &CoinSummary) -> Ordering {
        let ordering = OrderedFloat(self.field.key(a)).cmp(&OrderedFloat(self.field.key(b)));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// How repeated sort invocations pick a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Every invocation flips the pending direction, whatever the field.
    /// A newly selected field inherits the last toggled direction.
    #[default]
    ToggleEveryInvocation,
    /// A new field starts ascending; only re-selecting the same field toggles.
    ResetOnFieldChange,
}

impl FromStr for SortPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "toggle_every_invocation" | "toggle" => Ok(SortPolicy::ToggleEveryInvocation),
            "reset_on_field_change" | "reset" => Ok(SortPolicy::ResetOnFieldChange),
            other => Err(format!("unknown sort policy '{}'", other)),
        }
    }
}

/// Sort control state machine behind the sort keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    policy: SortPolicy,
    active: Option<SortOrder>,
    pending: SortDirection,
}

impl SortState {
    pub fn new(policy: SortPolicy) -> Self {
        Self {
            policy,
            active: None,
            pending: SortDirection::Ascending,
        }
    }

    /// Sort by `field`, returning the order that is now active
    pub fn invoke(&mut self, field: SortField) -> SortOrder {
        let direction = match self.policy {
            SortPolicy::ToggleEveryInvocation => self.pending,
            SortPolicy::ResetOnFieldChange => match self.active {
                Some(active) if active.field == field => active.direction.toggled(),
                _ => SortDirection::Ascending,
            },
        };

        let order = SortOrder::new(field, direction);
        self.active = Some(order);
        self.pending = direction.toggled();
        order
    }

    pub fn active(&self) -> Option<SortOrder> {
        self.active
    }

    /// Direction the next invocation would use under the legacy policy
    pub fn pending_direction(&self) -> SortDirection {
        self.pending
    }

    pub fn policy(&self) -> SortPolicy {
        self.policy
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortPolicy::default())
    }
}

/// Everything the list view needs to derive the visible rows
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search_term: String,
    pub sort: Option<SortOrder>,
    /// 1-based page index
    pub page: usize,
    pub page_size: usize,
}

impl ListQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            sort: None,
            page: 1,
            page_size,
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One page of the filtered and sorted snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: Vec<&'a CoinSummary>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_len: usize,
    /// Offset of the first row within the filtered list
    pub first_index: usize,
}

impl PageView<'_> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page index points past the filtered rows
    pub fn is_out_of_range(&self) -> bool {
        self.rows.is_empty() && self.filtered_len > 0
    }
}

/// Keep coins whose name or symbol contains `term`, ignoring case
pub fn filter<'a>(snapshot: &'a [CoinSummary], term: &str) -> Vec<&'a CoinSummary> {
    if term.is_empty() {
        return snapshot.iter().collect();
    }

    let needle = term.to_lowercase();
    snapshot
        .iter()
        .filter(|coin| {
            coin.name.to_lowercase().contains(&needle)
                || coin.symbol.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stable sort by a single numeric field
pub fn sort_rows(rows: &mut [&CoinSummary], order: SortOrder) {
    rows.sort_by(|a, b| order.compare(a, b));
}

/// `ceil(len / page_size)`; zero when the page size is zero
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Slice `[(page-1)*size, page*size)` without clamping the page index
pub fn paginate<'a>(rows: &[&'a CoinSummary], page: usize, page_size: usize) -> PageView<'a> {
    let filtered_len = rows.len();
    let total_pages = total_pages(filtered_len, page_size);

    let first_index = page.saturating_sub(1).saturating_mul(page_size);
    let visible = if page == 0 || page_size == 0 || first_index >= filtered_len {
        Vec::new()
    } else {
        let end = first_index.saturating_add(page_size).min(filtered_len);
        rows[first_index..end].to_vec()
    };

    PageView {
        rows: visible,
        page,
        total_pages,
        filtered_len,
        first_index,
    }
}

/// Run filter, sort and paginate in that order
pub fn apply<'a>(snapshot: &'a [CoinSummary], query: &ListQuery) -> PageView<'a> {
    let mut rows = filter(snapshot, &query.search_term);
    if let Some(order) = query.sort {
        sort_rows(&mut rows, order);
    }
    paginate(&rows, query.page, query.page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, name: &str, symbol: &str, price: f64) -> CoinSummary {
        let mut coin = CoinSummary::new(id, name, symbol);
        coin.current_price = price;
        coin.market_cap = price * 1_000.0;
        coin.total_volume = 1_000_000.0 / price;
        coin
    }

    fn scenario() -> Vec<CoinSummary> {
        vec![coin("a", "Bitcoin", "btc", 100.0), coin("b", "Ether", "eth", 50.0)]
    }

    fn ids(rows: &[&CoinSummary]) -> Vec<String> {
        rows.iter().map(|c| c.id.clone()).collect()
    }

    fn numbered(n: usize) -> Vec<CoinSummary> {
        (0..n)
            .map(|i| coin(&format!("c{}", i), &format!("Coin {}", i), "cn", (i + 1) as f64))
            .collect()
    }

    #[test]
    fn test_empty_term_is_identity() {
        let snapshot = scenario();
        assert_eq!(ids(&filter(&snapshot, "")), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_matches_name_or_symbol_case_insensitively() {
        let snapshot = scenario();
        assert_eq!(ids(&filter(&snapshot, "eth")), vec!["b"]);
        assert_eq!(ids(&filter(&snapshot, "BIT")), vec!["a"]);
        assert_eq!(ids(&filter(&snapshot, "BtC")), vec!["a"]);
        assert!(filter(&snapshot, "doge").is_empty());
    }

    #[test]
    fn test_sort_toggle_scenario() {
        let snapshot = scenario();
        let mut state = SortState::default();
        let mut query = ListQuery::default();

        query.sort = Some(state.invoke(SortField::Price));
        assert_eq!(ids(&apply(&snapshot, &query).rows), vec!["b", "a"]);

        query.sort = Some(state.invoke(SortField::Price));
        assert_eq!(ids(&apply(&snapshot, &query).rows), vec!["a", "b"]);
    }

    #[test]
    fn test_legacy_policy_new_field_inherits_toggled_direction() {
        let mut state = SortState::new(SortPolicy::ToggleEveryInvocation);
        assert_eq!(state.invoke(SortField::Price).direction, SortDirection::Ascending);
        assert_eq!(state.invoke(SortField::MarketCap).direction, SortDirection::Descending);
        assert_eq!(state.invoke(SortField::Volume).direction, SortDirection::Ascending);
    }

    #[test]
    fn test_reset_policy_new_field_starts_ascending() {
        let mut state = SortState::new(SortPolicy::ResetOnFieldChange);
        assert_eq!(state.invoke(SortField::Price).direction, SortDirection::Ascending);
        assert_eq!(state.invoke(SortField::Price).direction, SortDirection::Descending);
        assert_eq!(state.invoke(SortField::MarketCap).direction, SortDirection::Ascending);
        assert_eq!(state.invoke(SortField::MarketCap).direction, SortDirection::Descending);
    }

    #[test]
    fn test_sort_orders_every_field_both_ways() {
        let snapshot = numbered(7);
        for field in [SortField::Price, SortField::MarketCap, SortField::Volume] {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let mut rows = filter(&snapshot, "");
                sort_rows(&mut rows, SortOrder::new(field, direction));
                for pair in rows.windows(2) {
                    let (a, b) = (field.key(pair[0]), field.key(pair[1]));
                    match direction {
                        SortDirection::Ascending => assert!(a <= b),
                        SortDirection::Descending => assert!(a >= b),
                    }
                }
            }
        }
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let snapshot = vec![coin("x", "X", "x", 5.0), coin("y", "Y", "y", 5.0), coin("z", "Z", "z", 1.0)];
        let mut rows = filter(&snapshot, "");
        sort_rows(&mut rows, SortOrder::new(SortField::Price, SortDirection::Ascending));
        assert_eq!(ids(&rows), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_pagination_45_rows_20_per_page() {
        let snapshot = numbered(45);
        let rows = filter(&snapshot, "");
        let page = paginate(&rows, 3, 20);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.first_index, 40);
        assert_eq!(page.rows[0].id, "c40");
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_every_valid_page_is_contiguous() {
        let snapshot = numbered(53);
        let rows = filter(&snapshot, "");
        let size = 10;
        let pages = total_pages(rows.len(), size);
        assert_eq!(pages, 6);

        let mut seen = Vec::new();
        for p in 1..=pages {
            let view = paginate(&rows, p, size);
            assert_eq!(view.rows.len(), size.min(rows.len() - (p - 1) * size));
            seen.extend(ids(&view.rows));
        }
        assert_eq!(seen, ids(&rows));
    }

    #[test]
    fn test_out_of_range_page_is_not_clamped() {
        let snapshot = numbered(45);
        let mut query = ListQuery::default();
        query.page = 3;
        query.search_term = "Coin 1".to_string();

        let view = apply(&snapshot, &query);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.page, 3);
        assert!(view.rows.is_empty());
        assert!(view.is_out_of_range());
    }

    #[test]
    fn test_degenerate_page_inputs() {
        let snapshot = numbered(3);
        let rows = filter(&snapshot, "");
        assert!(paginate(&rows, 0, 20).rows.is_empty());
        assert_eq!(paginate(&rows, 1, 0).total_pages, 0);
        assert_eq!(total_pages(0, 20), 0);
    }

    #[test]
    fn test_apply_is_idempotent_and_leaves_snapshot_untouched() {
        let snapshot = numbered(30);
        let before = snapshot.clone();
        let query = ListQuery {
            search_term: "coin 2".to_string(),
            sort: Some(SortOrder::new(SortField::Price, SortDirection::Descending)),
            page: 1,
            page_size: 5,
        };

        let first = apply(&snapshot, &query);
        let second = apply(&snapshot, &query);
        assert_eq!(first, second);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("price".parse::<SortField>(), Ok(SortField::Price));
        assert_eq!("market-cap".parse::<SortField>(), Ok(SortField::MarketCap));
        assert_eq!("Volume".parse::<SortField>(), Ok(SortField::Volume));
        assert!("rank".parse::<SortField>().is_err());
    }
}
