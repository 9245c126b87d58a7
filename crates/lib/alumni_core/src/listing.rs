//! Pagination, sorting and search rules shared by every listing.
//!
//! Query parameters arrive as raw strings so that unparsable values fall back
//! to defaults instead of failing the request.

use serde::{Deserialize, Serialize};

/// Page size used when `limit` is missing or outside `1..=MAX_LIMIT`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Case-insensitive; anything other than `desc` sorts ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Raw listing query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy", alias = "sort_by")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Validated listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    /// Always one of the entity's whitelisted column names.
    pub sort_by: &'static str,
    pub order: SortOrder,
    /// Trimmed, non-empty search term.
    pub search: Option<String>,
}

impl ListParams {
    /// Resolve raw parameters against an entity's sort whitelist.
    ///
    /// The first whitelisted column is the default sort key.
    pub fn resolve(&self, sort_columns: &'static [&'static str]) -> ListQuery {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .unwrap_or(DEFAULT_LIMIT);
        let default_sort = sort_columns.first().copied().unwrap_or("id");
        let sort_by = self
            .sort_by
            .as_deref()
            .map(str::trim)
            .and_then(|s| sort_columns.iter().copied().find(|c| *c == s))
            .unwrap_or(default_sort);
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        ListQuery {
            page,
            limit,
            sort_by,
            order: SortOrder::parse(self.order.as_deref()),
            search,
        }
    }
}

impl ListQuery {
    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Search term as a `LIKE`/`ILIKE` pattern with wildcards escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| {
            let escaped = s
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Number of pages for `total` matches; never less than one.
pub fn page_count(total: u64, limit: u32) -> u64 {
    let limit = u64::from(limit.max(1));
    total.div_ceil(limit).max(1)
}

/// Pagination metadata returned under `meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
    #[serde(rename = "sortBy")]
    pub sort_by: &'static str,
    pub order: SortOrder,
    pub search: String,
}

impl PageMeta {
    pub fn new(query: &ListQuery, total: u64) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            total,
            pages: page_count(total, query.limit),
            sort_by: query.sort_by,
            order: query.order,
            search: query.search.clone().unwrap_or_default(),
        }
    }
}
