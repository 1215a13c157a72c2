//! Page-number pagination (`?page=2&limit=6`).

use crate::query::query_pairs;

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Read `page` and `limit` from a raw query string, ignoring bad values.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut page = None;
        let mut limit = None;
        for (key, value) in query_pairs(query.unwrap_or("")) {
            match key.as_str() {
                "page" => page = value.trim().parse().ok(),
                "limit" => limit = value.trim().parse().ok(),
                _ => {}
            }
        }
        Self::new(page, limit)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn has_next(&self, count: i64) -> bool {
        self.page.saturating_mul(self.limit) < count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Absolute link to `page` of the current listing: the original query string
/// with its `page` parameter replaced.
pub fn page_link(base_url: &str, path: &str, query: Option<&str>, page: i64) -> String {
    let mut params: Vec<&str> = query
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("page"))
        .collect();
    let page_param = format!("page={}", page);
    params.push(&page_param);

    format!(
        "{}{}?{}",
        base_url.trim_end_matches('/'),
        path,
        params.join("&")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(PageRequest::new(None, None), PageRequest::default());
        let request = PageRequest::new(Some(0), Some(10_000));
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(3), Some(-4)).limit, 1);
    }

    #[test]
    fn test_offset_and_neighbours() {
        let request = PageRequest::new(Some(3), Some(10));
        assert_eq!(request.offset(), 20);
        assert!(request.has_previous());
        assert!(request.has_next(31));
        assert!(!request.has_next(30));
        assert!(!PageRequest::default().has_previous());
    }

    #[test]
    fn test_from_query_ignores_garbage() {
        let request = PageRequest::from_query(Some("page=2&limit=abc&tags=x"));
        assert_eq!(request.page, 2);
        assert_eq!(request.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::from_query(None), PageRequest::default());
    }

    #[test]
    fn test_page_link_replaces_page() {
        let link = page_link(
            "http://localhost:3000/",
            "/api/recipes",
            Some("tags=lunch&page=2&limit=6"),
            3,
        );
        assert_eq!(
            link,
            "http://localhost:3000/api/recipes?tags=lunch&limit=6&page=3"
        );
    }

    #[test]
    fn test_page_link_without_query() {
        assert_eq!(
            page_link("http://h", "/api/users", None, 2),
            "http://h/api/users?page=2"
        );
    }
}
