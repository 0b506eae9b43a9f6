//! Pagination utilities
//!
//! Paged endpoints accept `limit` and `offset` query parameters. Both must be
//! non-negative integers; absent values fall back to 15 and 0.

use mlib_common::{Error, Result};

/// Page size used when `limit` is absent
pub const DEFAULT_LIMIT: i64 = 15;

/// Offset used when `offset` is absent
pub const DEFAULT_OFFSET: i64 = 0;

/// Validated SQL LIMIT/OFFSET pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Page {
    /// Parse raw query values
    ///
    /// A present but empty value is rejected like any other non-numeric input.
    ///
    /// # Examples
    /// ```
    /// use mlib_server::pagination::Page;
    ///
    /// let page = Page::parse(Some("2"), None).unwrap();
    /// assert_eq!(page.limit, 2);
    /// assert_eq!(page.offset, 0);
    ///
    /// assert!(Page::parse(Some("-1"), None).is_err());
    /// ```
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self> {
        Ok(Self {
            limit: parse_bound("limit", limit, DEFAULT_LIMIT)?,
            offset: parse_bound("offset", offset, DEFAULT_OFFSET)?,
        })
    }
}

fn parse_bound(name: &str, raw: Option<&str>, default: i64) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(Error::InvalidInput(format!("invalid '{}' parameter", name))),
    }
}
