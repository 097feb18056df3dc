//! Keyset pagination over UUID v7 primary keys.
//!
//! Every paginated read in the tick engine orders by primary key and
//! resumes from the last id seen. v7 ids are time-ordered, so the scan
//! order is also creation order and new rows land after the cursor.

use uuid::Uuid;

/// Default rows fetched per page.
pub const DEFAULT_PAGE_SIZE: i64 = 200;

/// One page of a keyset scan.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The rows in this page, ordered by id.
    pub items: Vec<T>,
    /// The cursor to pass for the next page; `None` when the scan is done.
    pub next_cursor: Option<Uuid>,
}

impl<T> Page<T> {
    /// Build a page from fetched items, deriving the next cursor.
    ///
    /// A short page (fewer items than requested) terminates the scan.
    pub fn new(items: Vec<T>, requested: i64, last_id: Option<Uuid>) -> Self {
        let full = i64::try_from(items.len()).unwrap_or(i64::MAX) >= requested;
        Self {
            items,
            next_cursor: if full { last_id } else { None },
        }
    }

    /// Whether the scan should continue after this page.
    pub const fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// The keyset lower bound for a cursor: scans resume strictly after it.
pub fn after(cursor: Option<Uuid>) -> Uuid {
    cursor.unwrap_or_else(Uuid::nil)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_page_ends_the_scan() {
        let last = Uuid::now_v7();
        let page = Page::new(vec![1, 2, 3], 5, Some(last));
        assert!(!page.has_more());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn full_page_carries_the_cursor() {
        let last = Uuid::now_v7();
        let page = Page::new(vec![1, 2, 3], 3, Some(last));
        assert!(page.has_more());
        assert_eq!(page.next_cursor, Some(last));
    }

    #[test]
    fn empty_page_has_no_cursor() {
        let page: Page<u32> = Page::new(Vec::new(), 10, None);
        assert!(!page.has_more());
    }

    #[test]
    fn nil_cursor_starts_the_scan() {
        assert_eq!(after(None), Uuid::nil());
        let id = Uuid::now_v7();
        assert_eq!(after(Some(id)), id);
    }
}
