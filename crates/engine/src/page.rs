//! Offset pagination shared by every list operation.

use crate::{EngineError, ResultEngine};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 2000;

/// A 0-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request, rejecting sizes outside `1..=MAX_PAGE_SIZE` and pages
    /// whose row offset does not fit in an `i64`.
    pub fn new(page: u64, size: u64) -> ResultEngine<Self> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(EngineError::InvalidInput(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        match page.checked_mul(size) {
            Some(offset) if offset <= i64::MAX as u64 => Ok(Self { page, size }),
            _ => Err(EngineError::InvalidInput(format!(
                "page {page} is out of range"
            ))),
        }
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    /// Replaces the content with an already converted vector, keeping the
    /// paging metadata.
    pub(crate) fn with_content<U>(self, content: Vec<U>) -> Page<U> {
        Page {
            content,
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_sizes() {
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1).is_err());
        assert_eq!(
            PageRequest::new(3, 50).unwrap(),
            PageRequest { page: 3, size: 50 }
        );
    }

    #[test]
    fn rejects_pages_past_the_offset_range() {
        assert_eq!(
            PageRequest::new(u64::MAX, 20),
            Err(EngineError::InvalidInput(format!(
                "page {} is out of range",
                u64::MAX
            )))
        );
        assert!(PageRequest::new(i64::MAX as u64, 2).is_err());
        assert!(PageRequest::new(i64::MAX as u64, 1).is_ok());
    }

    #[test]
    fn map_keeps_metadata() {
        let page = Page {
            content: vec![1, 2, 3],
            page: 1,
            size: 3,
            total_elements: 7,
            total_pages: 3,
        };
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20, 30]);
        assert_eq!(mapped.total_elements, 7);
        assert_eq!(mapped.total_pages, 3);
    }
}
