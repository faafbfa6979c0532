use serde::{Deserialize, Serialize};

/// One page of a limit/offset listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, limit: u32, offset: u32) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    /// Client-side page of an already fetched list.
    pub fn slice(all: Vec<T>, limit: u32, offset: u32) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Self::new(items, total, limit, offset)
    }

    /// 1-based page number.
    pub fn current_page(&self) -> u64 {
        if self.limit == 0 {
            return 1;
        }
        (self.offset / self.limit) as u64 + 1
    }

    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit as u64)
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub fn has_next(&self) -> bool {
        (self.offset as u64 + self.items.len() as u64) < self.total
    }

    pub fn next_offset(&self) -> Option<u32> {
        self.has_next().then(|| self.offset.saturating_add(self.limit))
    }

    pub fn previous_offset(&self) -> Option<u32> {
        self.has_previous()
            .then(|| self.offset.saturating_sub(self.limit))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_arithmetic_matches_catalog_pager() {
        let page = Page::new(vec![1; 9], 20, 9, 9);
        assert_eq!(page.current_page(), 2);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.next_offset(), Some(18));
        assert_eq!(page.previous_offset(), Some(0));

        let last = Page::new(vec![1; 2], 20, 9, 18);
        assert_eq!(last.current_page(), 3);
        assert!(!last.has_next());
        assert_eq!(last.next_offset(), None);
    }

    #[test]
    fn first_page_has_no_previous() {
        let page: Page<u8> = Page::new(vec![], 0, 20, 0);
        assert_eq!(page.total_pages(), 0);
        assert_eq!(page.previous_offset(), None);
        assert_eq!(page.next_offset(), None);
    }

    #[test]
    fn slice_pages_locally() {
        let page = Page::slice((1..=14).collect::<Vec<_>>(), 6, 6);
        assert_eq!(page.items, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(page.total, 14);
        assert!(page.has_next());
    }
}
