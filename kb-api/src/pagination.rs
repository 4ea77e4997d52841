//! Pagination utilities for rating listings

/// Default page size when the client does not specify one
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on the page size a client may request
pub const MAX_LIMIT: i64 = 50;

/// Sanitized page parameters ready for a LIMIT/OFFSET query
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Page size
    pub limit: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Resolve raw query parameters into sanitized page parameters.
///
/// Page defaults to 1 and is floored at 1; limit defaults to
/// [`DEFAULT_LIMIT`] and is clamped to `[1, MAX_LIMIT]`. A page past the
/// end of the result set is NOT clamped: it yields an empty page, which
/// the caller reports without error.
pub fn resolve(page: Option<i64>, limit: Option<i64>) -> PageParams {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    PageParams {
        page,
        limit,
        offset: (page - 1) * limit,
    }
}

/// Total pages = ceil(total / limit); 0 when the result set is empty
pub fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = resolve(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, DEFAULT_LIMIT);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_offset_calculation() {
        let p = resolve(Some(3), Some(10));
        assert_eq!(p.page, 3);
        assert_eq!(p.offset, 20);
    }

    #[test]
    fn test_page_floored_at_one() {
        let p = resolve(Some(0), None);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);

        let p = resolve(Some(-5), None);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(resolve(None, Some(500)).limit, MAX_LIMIT);
        assert_eq!(resolve(None, Some(0)).limit, 1);
    }

    #[test]
    fn test_page_beyond_last_not_clamped() {
        // 25 rows at limit 10 = 3 pages; page 7 still resolves, the
        // query just returns zero rows
        let p = resolve(Some(7), Some(10));
        assert_eq!(p.page, 7);
        assert_eq!(p.offset, 60);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(4, 10), 1);
    }
}
