// ── Paged list navigation ──
//
// Page index/size tracking and a bounded window of page numbers for
// navigation controls. Independent of polling: page changes take effect
// when the owning view next fetches.

/// One page's worth of position metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub size: usize,
    pub total_elements: u64,
    pub total_pages: usize,
}

impl Page {
    /// An empty result set at index 0.
    pub fn empty(size: usize) -> Self {
        Self {
            index: 0,
            size,
            total_elements: 0,
            total_pages: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.index < self.total_pages - 1
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }
}

/// Tracks the current page and derives navigation state.
#[derive(Debug, Clone)]
pub struct PagedList {
    page: Page,
}

impl PagedList {
    pub fn new(size: usize) -> Self {
        Self {
            page: Page::empty(size),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Fold a fetch result's totals back in. If the page count shrank
    /// under the current index, the index is clamped to the last page
    /// (or 0 for an empty set).
    pub fn apply(&mut self, total_elements: u64, total_pages: usize) -> Page {
        self.page.total_elements = total_elements;
        self.page.total_pages = total_pages;
        if total_pages == 0 {
            self.page.index = 0;
        } else if self.page.index >= total_pages {
            self.page.index = total_pages - 1;
        }
        self.page
    }

    /// Move to `index` if it is a valid page, otherwise leave the state
    /// unchanged. With zero pages only index 0 is valid.
    pub fn go_to(&mut self, index: usize) -> Page {
        let valid = if self.page.total_pages == 0 {
            index == 0
        } else {
            index < self.page.total_pages
        };
        if valid {
            self.page.index = index;
        }
        self.page
    }

    pub fn next(&mut self) -> Page {
        if self.page.has_next() {
            self.go_to(self.page.index + 1)
        } else {
            self.page
        }
    }

    pub fn previous(&mut self) -> Page {
        if self.page.has_previous() {
            self.go_to(self.page.index - 1)
        } else {
            self.page
        }
    }

    /// A contiguous run of `min(max_visible, total_pages)` page indices,
    /// centered on the current index where possible and clamped at both
    /// ends, never containing an index outside `[0, total_pages)`.
    pub fn visible_window(&self, max_visible: usize) -> Vec<usize> {
        let count = max_visible.min(self.page.total_pages);
        if count == 0 {
            return Vec::new();
        }
        let start = self
            .page
            .index
            .saturating_sub(max_visible / 2)
            .min(self.page.total_pages - count);
        (start..start + count).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn list(index: usize, total_pages: usize) -> PagedList {
        let mut list = PagedList::new(20);
        list.apply(total_pages as u64 * 20, total_pages);
        list.go_to(index);
        list
    }

    #[test]
    fn go_to_out_of_range_leaves_state_unchanged() {
        let mut list = list(2, 5);
        assert_eq!(list.go_to(7).index, 2);
        assert_eq!(list.go_to(4).index, 4);
    }

    #[test]
    fn zero_pages_admits_only_index_zero() {
        let mut list = PagedList::new(20);
        assert_eq!(list.go_to(1).index, 0);
        assert_eq!(list.go_to(0).index, 0);
        assert!(!list.page().has_next());
        assert!(!list.page().has_previous());
    }

    #[test]
    fn next_and_previous_respect_bounds() {
        let mut list = list(0, 3);
        assert!(!list.page().has_previous());
        assert_eq!(list.previous().index, 0);

        assert_eq!(list.next().index, 1);
        assert_eq!(list.next().index, 2);
        assert!(!list.page().has_next());
        assert_eq!(list.next().index, 2);
    }

    #[test]
    fn apply_clamps_a_stranded_index() {
        let mut list = list(4, 5);
        assert_eq!(list.apply(40, 2).index, 1);
        assert_eq!(list.apply(0, 0).index, 0);
    }

    #[test]
    fn visible_window_is_centered_and_clamped() {
        assert_eq!(list(5, 10).visible_window(5), vec![3, 4, 5, 6, 7]);
        assert_eq!(list(0, 10).visible_window(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(list(9, 10).visible_window(5), vec![5, 6, 7, 8, 9]);
        // Fewer pages than the window caps the run.
        assert_eq!(list(1, 3).visible_window(5), vec![0, 1, 2]);
        assert_eq!(list(0, 0).visible_window(5), Vec::<usize>::new());
    }
}
