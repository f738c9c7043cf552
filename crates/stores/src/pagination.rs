/// Pagination fields every list store holds, overwritten from each response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    /// 1-based page index
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PageState {
    pub fn new(per_page: u32) -> Self {
        Self { current_page: 1, per_page: per_page.clamp(1, 500), total_items: 0, total_pages: 0 }
    }

    /// Overwrite from a response envelope.
    pub fn absorb(&mut self, page: u32, total_items: u64, total_pages: u32) {
        self.current_page = page;
        self.total_items = total_items;
        self.total_pages = total_pages;
    }

    /// Whether `page` is a real target. Out-of-range requests are no-ops at
    /// the store level: no backend call, no state change.
    pub fn in_range(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(20)
    }
}

#[cfg(test)]
mod tests {
    use super::PageState;

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(PageState::new(0).per_page, 1);
        assert_eq!(PageState::new(9999).per_page, 500);
    }

    #[test]
    fn in_range_rejects_zero_and_past_end() {
        let mut s = PageState::new(10);
        s.absorb(1, 25, 3);
        assert!(!s.in_range(0));
        assert!(s.in_range(1));
        assert!(s.in_range(3));
        assert!(!s.in_range(4));
    }

    #[test]
    fn fresh_state_has_no_valid_pages() {
        let s = PageState::new(10);
        assert!(!s.in_range(1));
    }
}
