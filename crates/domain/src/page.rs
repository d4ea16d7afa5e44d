use serde::{Deserialize, Serialize};

/// One page of a `skip`/`limit` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// A page whose total is just its own length.
    pub fn from_items(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self { items, total }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    pub fn first(limit: u64) -> Self {
        Self { skip: 0, limit }
    }

    /// Zero-based page number for `skip`.
    pub fn page_index(&self) -> u64 {
        if self.limit == 0 { 0 } else { self.skip / self.limit }
    }

    pub fn next(&self) -> Self {
        Self {
            skip: self.skip + self.limit,
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { skip: 0, limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_navigation() {
        let req = PageRequest::first(10);
        assert_eq!(req.page_index(), 0);
        let next = req.next();
        assert_eq!(next.skip, 10);
        assert_eq!(next.page_index(), 1);
    }

    #[test]
    fn test_page_index_with_zero_limit() {
        assert_eq!(PageRequest::new(30, 0).page_index(), 0);
    }

    #[test]
    fn test_page_from_items() {
        let page = Page::from_items(vec![1, 2, 3]);
        assert_eq!(page.total, 3);
        assert!(!page.is_empty());
    }
}
