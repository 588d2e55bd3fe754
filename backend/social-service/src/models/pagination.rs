use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Keeps `offset()` within `i64` for every accepted limit.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// `?page=&limit=` query; missing or out-of-range values fall back to defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl From<PageQuery> for Pagination {
    fn from(query: PageQuery) -> Self {
        let page = query
            .page
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE)
            .min(MAX_PAGE);
        let limit = query
            .limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Self { page, limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::from(PageQuery::default());
        assert_eq!(p, Pagination { page: 1, limit: 10 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let p = Pagination::from(PageQuery {
            page: Some(0),
            limit: Some(1000),
        });
        assert_eq!(p, Pagination { page: 1, limit: 100 });

        let p = Pagination::from(PageQuery {
            page: Some(3),
            limit: Some(-5),
        });
        assert_eq!(p, Pagination { page: 3, limit: 10 });
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn test_huge_page_does_not_overflow_offset() {
        let p = Pagination::from(PageQuery {
            page: Some(i64::MAX),
            limit: Some(MAX_LIMIT),
        });
        assert_eq!(p.page, MAX_PAGE);
        assert!(p.offset() > 0);

        let p = Pagination::from(PageQuery {
            page: Some(i64::MAX),
            limit: Some(10),
        });
        assert!(p.offset() > 0);
    }
}
