//! Offset/limit paging over a static list.

/// Page sizes offered by the parameter catalog.
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: PAGE_SIZES[0],
        }
    }
}

impl Pager {
    #[inline]
    pub fn page(&self) -> usize {
        self.page
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Changes the page size and goes back to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 0;
    }

    /// Steps through [PAGE_SIZES], wrapping around.
    pub fn cycle_page_size(&mut self) {
        let pos = PAGE_SIZES.iter().position(|s| *s == self.page_size);
        let next = pos.map_or(0, |p| (p + 1) % PAGE_SIZES.len());
        self.set_page_size(PAGE_SIZES[next]);
    }

    /// Back to the first page, used when the filtered list changes.
    pub fn reset(&mut self) {
        self.page = 0;
    }

    pub fn next(&mut self, total: usize) {
        if self.page + 1 < self.page_count(total) {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// The current page of `items`. Past the end yields an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.page.saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_pages() {
        let items: Vec<usize> = (0..23).collect();
        let mut pager = Pager::default();
        assert_eq!(pager.page_count(items.len()), 3);
        assert_eq!(pager.slice(&items), &items[0..10]);

        pager.next(items.len());
        pager.next(items.len());
        assert_eq!(pager.slice(&items), &items[20..23]);

        // already on the last page
        pager.next(items.len());
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut pager = Pager::default();
        pager.next(100);
        pager.cycle_page_size();
        assert_eq!(pager.page(), 0);
        assert_eq!(pager.page_size(), 25);

        pager.set_page_size(100);
        pager.cycle_page_size();
        assert_eq!(pager.page_size(), 10);
    }

    #[test]
    fn empty_list_has_one_page() {
        let pager = Pager::default();
        let items: [u8; 0] = [];
        assert_eq!(pager.page_count(0), 1);
        assert!(pager.slice(&items).is_empty());
    }
}
