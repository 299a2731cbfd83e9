//! Page-number pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept `page` and `per_page` query parameters. Both are
//! optional and lenient: a missing, non-numeric, zero, or negative value falls
//! back to [`DEFAULT_PAGE`] or [`DEFAULT_PER_PAGE`]. The normalized
//! [`PageRequest`] then yields the offset and limit a storage adapter needs.

use serde::Deserialize;

/// Page number used when the caller supplies none or an invalid one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller supplies none or an invalid one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Raw pagination query parameters as received on the wire.
///
/// Values are kept as strings so that malformed input degrades to defaults
/// instead of rejecting the request.
///
/// # Examples
/// ```
/// use pagination::{PageQuery, PageRequest};
///
/// let query = PageQuery {
///     page: Some("2".to_owned()),
///     per_page: Some("abc".to_owned()),
/// };
/// assert_eq!(query.normalize(), PageRequest::new(2, 10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    /// One-based page number.
    #[serde(default)]
    pub page: Option<String>,
    /// Maximum number of items per page.
    #[serde(default)]
    pub per_page: Option<String>,
}

impl PageQuery {
    /// Normalize the raw values into a [`PageRequest`].
    #[must_use]
    pub fn normalize(&self) -> PageRequest {
        PageRequest::new(lenient(self.page.as_deref()), lenient(self.per_page.as_deref()))
    }
}

fn lenient(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(0)
}

/// A normalized page request. Both components are always at least one.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 25);
/// assert_eq!(request.offset(), 50);
/// assert_eq!(request.limit(), 25);
///
/// let fallback = PageRequest::new(0, -4);
/// assert_eq!((fallback.page(), fallback.per_page()), (1, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a request, replacing non-positive values with the defaults.
    #[must_use]
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            per_page: positive_or(per_page, DEFAULT_PER_PAGE),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items to skip before the page starts.
    ///
    /// Saturates at `i64::MAX` for absurdly large page numbers.
    #[must_use]
    pub fn offset(&self) -> i64 {
        let skipped = u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page);
        i64::try_from(skipped).unwrap_or(i64::MAX)
    }

    /// Maximum number of items in the page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

fn positive_or(value: i64, fallback: u32) -> u32 {
    if value <= 0 {
        return fallback;
    }
    u32::try_from(value).unwrap_or(u32::MAX)
}
