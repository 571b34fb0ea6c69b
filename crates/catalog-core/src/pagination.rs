//! List query model and paged results.
//!
//! A [`ListQuery`] is what a caller asked for; a [`NormalizedListQuery`] is
//! what actually gets executed and cached. Every out-of-range or unknown
//! input is corrected here rather than rejected, so two requests that mean
//! the same thing always normalize to equal values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// The maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Ordering applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recently created first (identity descending).
    #[default]
    Default,
    /// Price ascending.
    PriceAsc,
    /// Price descending.
    PriceDesc,
}

impl SortKey {
    /// Parses a raw sort parameter. Anything unrecognized is [`SortKey::Default`].
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            _ => Self::Default,
        }
    }

    /// Returns the canonical token for this sort key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A list request as received from a caller, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    /// Creates a query for the given page and page size.
    #[must_use]
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            search: None,
            sort: None,
        }
    }

    /// Sets the search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the sort parameter.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Normalizes the query.
    ///
    /// - `page < 1` becomes 1
    /// - `page_size < 1` becomes [`DEFAULT_PAGE_SIZE`], and is capped at [`MAX_PAGE_SIZE`]
    /// - the search term is trimmed and lower-cased; empty means absent
    /// - unknown sort values become [`SortKey::Default`]
    #[must_use]
    pub fn normalize(&self) -> NormalizedListQuery {
        let page = match self.page {
            Some(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
            _ => 1,
        };
        let page_size = match self.page_size {
            Some(size) if size >= 1 => u32::try_from(size).unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        let search = self
            .search
            .as_deref()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());

        NormalizedListQuery {
            page,
            page_size,
            search,
            sort: SortKey::parse(self.sort.as_deref()),
        }
    }
}

/// A list query after normalization. Only obtainable via [`ListQuery::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedListQuery {
    page: u32,
    page_size: u32,
    search: Option<String>,
    sort: SortKey,
}

impl NormalizedListQuery {
    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Trimmed, lower-cased search term.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Number of rows to take.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.page_size
    }
}

impl Default for NormalizedListQuery {
    fn default() -> Self {
        ListQuery::default().normalize()
    }
}

/// A page of results together with the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// The items on this page, in query order.
    pub items: Vec<T>,
    /// Total number of items matching the filter across all pages.
    pub total_count: u64,
    /// One-based page number.
    pub page: u32,
    /// Page size used to slice the results.
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    /// Creates a new page for the given query.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, query: &NormalizedListQuery) -> Self {
        Self {
            items,
            total_count,
            page: query.page(),
            page_size: query.page_size(),
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(query: &NormalizedListQuery) -> Self {
        Self::new(Vec::new(), 0, query)
    }

    /// Maps the page items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent() {
        let q = ListQuery::default().normalize();
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(q.search(), None);
        assert_eq!(q.sort(), SortKey::Default);
    }

    #[test]
    fn test_non_positive_page_becomes_one() {
        assert_eq!(ListQuery::new(0, 10).normalize().page(), 1);
        assert_eq!(ListQuery::new(-5, 10).normalize().page(), 1);
    }

    #[test]
    fn test_non_positive_page_size_becomes_default() {
        assert_eq!(ListQuery::new(1, 0).normalize().page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(ListQuery::new(1, -3).normalize().page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_size_is_capped() {
        assert_eq!(ListQuery::new(1, 1000).normalize().page_size(), MAX_PAGE_SIZE);
        assert_eq!(ListQuery::new(1, i64::MAX).normalize().page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        assert_eq!(ListQuery::new(i64::MAX, 10).normalize().page(), u32::MAX);
    }

    #[test]
    fn test_search_is_trimmed_and_lowercased() {
        let q = ListQuery::new(1, 20).with_search("  WiDGet ").normalize();
        assert_eq!(q.search(), Some("widget"));
    }

    #[test]
    fn test_blank_search_is_absent() {
        let q = ListQuery::new(1, 20).with_search("   ").normalize();
        assert_eq!(q.search(), None);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(SortKey::parse(Some("price_asc")), SortKey::PriceAsc);
        assert_eq!(SortKey::parse(Some(" price_desc ")), SortKey::PriceDesc);
        assert_eq!(SortKey::parse(Some("default")), SortKey::Default);
        assert_eq!(SortKey::parse(Some("name_asc")), SortKey::Default);
        assert_eq!(SortKey::parse(None), SortKey::Default);
    }

    #[test]
    fn test_null_and_empty_variants_normalize_equal() {
        let a = ListQuery::new(1, 20).normalize();
        let b = ListQuery::new(1, 20).with_search("").with_sort("default").normalize();
        assert_eq!(a, b);
    }

    #[test]
    fn test_offset_calculation() {
        assert_eq!(ListQuery::new(1, 20).normalize().offset(), 0);
        assert_eq!(ListQuery::new(2, 10).normalize().offset(), 10);
        assert_eq!(ListQuery::new(5, 15).normalize().offset(), 60);
    }

    #[test]
    fn test_paged_result_map() {
        let q = ListQuery::new(2, 3).normalize();
        let page = PagedResult::new(vec![1, 2, 3], 9, &q).map(|x| x * 2);
        assert_eq!(page.items, vec![2, 4, 6]);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 3);
        assert_eq!(page.total_count, 9);
    }

    #[test]
    fn test_paged_result_serializes_camel_case() {
        let q = ListQuery::new(1, 20).normalize();
        let json = serde_json::to_value(PagedResult::new(vec![1], 1, &q)).unwrap();
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["pageSize"], 20);
    }
}
