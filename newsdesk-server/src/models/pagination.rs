//! Category pagination

use serde::Serialize;

use super::{Article, ValidationError};

/// Articles per category page
pub const PAGE_SIZE: i64 = 5;

/// Validated 1-indexed page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    pub const FIRST: Page = Page(1);

    /// Create a page number.
    ///
    /// Zero and negative pages are rejected rather than clamped, so a bad
    /// client request never turns into a negative OFFSET.
    pub fn new(page: i64) -> Result<Self, ValidationError> {
        if page < 1 {
            return Err(ValidationError::OutOfRange {
                field: "page",
                value: page,
                min: 1,
                max: i64::MAX,
            });
        }
        Ok(Self(page))
    }

    /// Parse a page number from a path segment.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let page = s.parse::<i64>().map_err(|e| ValidationError::Malformed {
            field: "page",
            reason: e.to_string(),
        })?;
        Self::new(page)
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        (self.0 - 1).saturating_mul(PAGE_SIZE)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }
}

/// Number of pages needed for `count` articles; zero when there are none.
pub fn total_pages(count: i64) -> i64 {
    if count <= 0 {
        0
    } else {
        (count + PAGE_SIZE - 1) / PAGE_SIZE
    }
}

/// One page of a category listing
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPage {
    /// Articles on this page, newest first
    pub articles: Vec<Article>,
    /// Total pages in the category
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        assert_eq!(Page::new(1).unwrap().offset(), 0);
        assert_eq!(Page::new(2).unwrap().offset(), 5);
        assert_eq!(Page::new(7).unwrap().offset(), 30);
        assert_eq!(Page::FIRST.limit(), 5);
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert!(matches!(
            Page::new(0).unwrap_err(),
            ValidationError::OutOfRange { field: "page", value: 0, .. }
        ));
        assert!(Page::new(-3).is_err());
    }

    #[test]
    fn parse_from_path_segment() {
        assert_eq!(Page::parse("3").unwrap().get(), 3);
        assert!(matches!(
            Page::parse("three").unwrap_err(),
            ValidationError::Malformed { field: "page", .. }
        ));
        assert!(Page::parse("0").is_err());
        assert!(Page::parse("1.5").is_err());
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let page = Page::new(i64::MAX).unwrap();
        assert_eq!(page.offset(), i64::MAX);
    }

    #[test]
    fn total_pages_is_ceiling() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(5), 1);
        assert_eq!(total_pages(6), 2);
        assert_eq!(total_pages(10), 2);
        assert_eq!(total_pages(11), 3);
    }
}
