//! Page/limit pagination shared by every listing endpoint.

use serde::Serialize;

/// Page used when the client sends none (or garbage).
pub const DEFAULT_PAGE: u32 = 1;
/// Limit used when the client sends none (or garbage).
pub const DEFAULT_LIMIT: u32 = 10;

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request, replacing zero values with the defaults.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Parse raw query-string values. Missing, non-numeric, zero and
    /// negative values all fall back to the defaults.
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_leading_int(page), parse_leading_int(limit))
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Leading-digits integer parse (`"12abc"` is 12). Anything else is 0.
fn parse_leading_int(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else { return 0 };
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// One page of results together with the counters clients use to paginate.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// `ceil(total / limit)`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.limit()))
    }

    /// Counters in their wire shape.
    #[must_use]
    pub fn info(&self) -> PageInfo {
        PageInfo {
            total: self.total,
            page: self.request.page(),
            limit: self.request.limit(),
            total_pages: self.total_pages(),
        }
    }
}

/// Pagination counters as serialized in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}
