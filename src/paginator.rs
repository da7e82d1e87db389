//! Page arithmetic for message lists.

use std::num::NonZeroUsize;

/// How many messages one page holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSize {
    /// All messages on a single page.
    Unlimited,
    /// At most this many messages per page.
    Limited(NonZeroUsize),
}

impl PageSize {
    /// Interpret a raw page size where `-1` (or any other non-positive value) means unlimited.
    pub fn from_raw(size: i64) -> Self {
        usize::try_from(size)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(PageSize::Unlimited, PageSize::Limited)
    }

    /// The raw form, `-1` for unlimited.
    pub fn to_raw(self) -> i64 {
        match self {
            PageSize::Unlimited => -1,
            PageSize::Limited(n) => i64::try_from(n.get()).unwrap_or(i64::MAX),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::from_raw(50)
    }
}

/// Tracks the current page of a list of `message_count` messages.
///
/// Pages are numbered from 1, and `1 <= current_page() <= max_page()` holds at all times. An
/// empty list still has one (empty) page.
#[derive(Clone, Debug)]
pub struct Paginator {
    page_size: PageSize,
    message_count: usize,
    page: usize,
}

impl Paginator {
    /// A paginator on page 1 of an empty list.
    pub fn new(page_size: PageSize) -> Self {
        Paginator {
            page_size,
            message_count: 0,
            page: 1,
        }
    }

    /// Messages per page.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Change the page size. Returns whether the current page moved as a result.
    pub fn set_page_size(&mut self, page_size: PageSize) -> bool {
        self.page_size = page_size;
        self.clamp()
    }

    /// The number of messages being paginated.
    pub fn message_count(&self) -> usize {
        self.message_count
    }

    /// Set the number of messages being paginated. Returns whether the current page moved as a
    /// result.
    pub fn set_message_count(&mut self, count: usize) -> bool {
        self.message_count = count;
        self.clamp()
    }

    /// The number of pages, never less than 1.
    pub fn max_page(&self) -> usize {
        match self.page_size {
            PageSize::Unlimited => 1,
            PageSize::Limited(size) => {
                let size = size.get();
                ((self.message_count + size - 1) / size).max(1)
            }
        }
    }

    /// The current page.
    pub fn current_page(&self) -> usize {
        match self.page_size {
            PageSize::Unlimited => 1,
            PageSize::Limited(_) => self.page.clamp(1, self.max_page()),
        }
    }

    /// Go to `page`, snapping out-of-range values to the nearest valid page. Returns whether the
    /// current page changed.
    pub fn set_current_page(&mut self, page: usize) -> bool {
        let page = page.clamp(1, self.max_page());
        let changed = page != self.page;
        self.page = page;
        changed
    }

    fn clamp(&mut self) -> bool {
        let page = self.page;
        self.set_current_page(page)
    }

    /// Whether there is a page after the current one.
    pub fn has_next_page(&self) -> bool {
        self.current_page() < self.max_page()
    }

    /// The page after the current one, wrapping around to 1 from the last page.
    pub fn next(&self) -> usize {
        if self.has_next_page() {
            self.current_page() + 1
        } else {
            1
        }
    }

    /// Whether there is a page before the current one.
    pub fn has_previous_page(&self) -> bool {
        self.current_page() > 1
    }

    /// The page before the current one, wrapping around to the last page from page 1.
    pub fn previous(&self) -> usize {
        if self.has_previous_page() {
            self.current_page() - 1
        } else {
            self.max_page()
        }
    }

    /// Whether the current page is the first one.
    pub fn is_first(&self) -> bool {
        self.current_page() == 1
    }

    /// Whether the current page is the last one.
    pub fn is_last(&self) -> bool {
        self.current_page() == self.max_page()
    }

    /// The number of the last page.
    pub fn last(&self) -> usize {
        self.max_page()
    }

    /// The index range of the current page within the full list.
    pub fn window(&self) -> std::ops::Range<usize> {
        match self.page_size {
            PageSize::Unlimited => 0..self.message_count,
            PageSize::Limited(size) => {
                let start = (self.current_page() - 1) * size.get();
                start.min(self.message_count)..(start + size.get()).min(self.message_count)
            }
        }
    }

    /// The current page's slice of `items`.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let window = self.window();
        let end = window.end.min(items.len());
        &items[window.start.min(end)..end]
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator::new(PageSize::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paginator(size: i64, count: usize) -> Paginator {
        let mut p = Paginator::new(PageSize::from_raw(size));
        p.set_message_count(count);
        p
    }

    #[test]
    fn max_page_rounds_up() {
        assert_eq!(paginator(50, 120).max_page(), 3);
        assert_eq!(paginator(50, 100).max_page(), 2);
        assert_eq!(paginator(50, 1).max_page(), 1);
        assert_eq!(paginator(50, 0).max_page(), 1);
        assert_eq!(paginator(-1, 5000).max_page(), 1);
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let mut p = paginator(50, 120);
        assert!(p.is_first());
        assert_eq!(p.previous(), 3);
        assert_eq!(p.next(), 2);

        assert!(p.set_current_page(3));
        assert!(p.is_last());
        assert!(!p.has_next_page());
        assert_eq!(p.next(), 1);
        assert_eq!(p.previous(), 2);
    }

    #[test]
    fn out_of_range_pages_snap() {
        let mut p = paginator(50, 120);
        assert!(p.set_current_page(10));
        assert_eq!(p.current_page(), 3);
        assert!(!p.set_current_page(7));
        assert!(p.set_current_page(0));
        assert_eq!(p.current_page(), 1);
        assert!(!p.set_current_page(1));
    }

    #[test]
    fn shrinking_list_pulls_the_page_back() {
        let mut p = paginator(10, 100);
        p.set_current_page(10);
        assert!(p.set_message_count(25));
        assert_eq!(p.current_page(), 3);
        assert_eq!(p.window(), 20..25);
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let p = paginator(50, 0);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.max_page(), 1);
        assert_eq!(p.window(), 0..0);
        assert_eq!(p.next(), 1);
        assert_eq!(p.previous(), 1);
    }

    #[test]
    fn window_slices() {
        let items: Vec<u32> = (1..=12).collect();
        let mut p = paginator(5, items.len());
        assert_eq!(p.apply(&items), &[1, 2, 3, 4, 5]);
        p.set_current_page(3);
        assert_eq!(p.apply(&items), &[11, 12]);

        let p = paginator(-1, items.len());
        assert_eq!(p.apply(&items).len(), 12);
    }

    #[test]
    fn raw_page_sizes() {
        assert_eq!(PageSize::from_raw(-1), PageSize::Unlimited);
        assert_eq!(PageSize::from_raw(0), PageSize::Unlimited);
        assert_eq!(PageSize::from_raw(20).to_raw(), 20);
        assert_eq!(PageSize::Unlimited.to_raw(), -1);
    }

    proptest! {
        #[test]
        fn page_stays_in_bounds(
            size in 1i64..100,
            count in 0usize..2000,
            pages in prop::collection::vec(0usize..100, 0..20),
        ) {
            let mut p = paginator(size, count);
            for page in pages {
                p.set_current_page(page);
                prop_assert!(p.max_page() >= 1);
                prop_assert!(p.current_page() >= 1);
                prop_assert!(p.current_page() <= p.max_page());
                let window = p.window();
                prop_assert!(window.end <= count);
                prop_assert!(window.len() <= size as usize);
            }
        }
    }
}
