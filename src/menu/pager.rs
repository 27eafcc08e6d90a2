/// Page navigation within `[0, page_count)`.
///
/// Every move returns `None` when it would not change the page, so a menu can treat
/// a press at a boundary as a rejected interaction instead of a re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_count: usize,
    wrap: bool,
    bulk_skip: usize,
}

impl Pager {
    /// `page_count` of zero is treated as one page.
    pub fn new(page_count: usize, wrap: bool, bulk_skip: usize) -> Self {
        Self {
            page_count: page_count.max(1),
            wrap,
            bulk_skip,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    /// Whether the bulk skip buttons are shown.
    pub fn skips(&self) -> bool {
        self.bulk_skip > 1
    }

    pub fn previous(&self, page: usize) -> Option<usize> {
        self.back(page, 1)
    }

    pub fn next(&self, page: usize) -> Option<usize> {
        self.forward(page, 1)
    }

    pub fn skip_back(&self, page: usize) -> Option<usize> {
        self.skips().then(|| self.back(page, self.bulk_skip)).flatten()
    }

    pub fn skip_forward(&self, page: usize) -> Option<usize> {
        self.skips()
            .then(|| self.forward(page, self.bulk_skip))
            .flatten()
    }

    /// Jumps to a 1-based page number.
    pub fn jump(&self, page: usize, number: usize) -> Option<usize> {
        let target = number.checked_sub(1)?;
        (target < self.page_count && target != page).then_some(target)
    }

    fn back(&self, page: usize, by: usize) -> Option<usize> {
        let target = if page >= by {
            page - by
        } else if self.wrap {
            (page + self.page_count - by % self.page_count) % self.page_count
        } else {
            0
        };
        (target != page).then_some(target)
    }

    fn forward(&self, page: usize, by: usize) -> Option<usize> {
        let last = self.page_count - 1;
        let target = match page.checked_add(by).filter(|target| *target <= last) {
            Some(target) => target,
            None if self.wrap => (page + by % self.page_count) % self.page_count,
            None => last,
        };
        (target != page).then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_reject_without_wrap() {
        let pager = Pager::new(3, false, 0);
        assert_eq!(pager.previous(0), None);
        assert_eq!(pager.next(0), Some(1));
        assert_eq!(pager.next(2), None);
        assert_eq!(pager.previous(2), Some(1));
    }

    #[test]
    fn test_wrap_crosses_ends() {
        let pager = Pager::new(3, true, 0);
        assert_eq!(pager.previous(0), Some(2));
        assert_eq!(pager.next(2), Some(0));
    }

    #[test]
    fn test_single_page_never_moves() {
        let pager = Pager::new(1, true, 5);
        assert_eq!(pager.previous(0), None);
        assert_eq!(pager.next(0), None);
        assert_eq!(pager.skip_forward(0), None);
    }

    #[test]
    fn test_bulk_skip_clamps_then_rejects() {
        let pager = Pager::new(10, false, 4);
        assert_eq!(pager.skip_forward(0), Some(4));
        assert_eq!(pager.skip_forward(7), Some(9));
        assert_eq!(pager.skip_forward(9), None);
        assert_eq!(pager.skip_back(2), Some(0));
        assert_eq!(pager.skip_back(0), None);
    }

    #[test]
    fn test_bulk_skip_wraps() {
        let pager = Pager::new(10, true, 4);
        assert_eq!(pager.skip_forward(8), Some(2));
        assert_eq!(pager.skip_back(1), Some(7));
    }

    #[test]
    fn test_huge_bulk_skip_saturates() {
        let pager = Pager::new(3, false, usize::MAX);
        assert_eq!(pager.skip_forward(1), Some(2));
        assert_eq!(pager.skip_forward(2), None);
        assert_eq!(pager.skip_back(1), Some(0));

        let wrapping = Pager::new(3, true, usize::MAX);
        // usize::MAX % 3 == 0
        assert_eq!(wrapping.skip_forward(1), None);
        assert_eq!(wrapping.skip_back(1), None);
    }

    #[test]
    fn test_bulk_skip_disabled() {
        let pager = Pager::new(10, false, 1);
        assert!(!pager.skips());
        assert_eq!(pager.skip_forward(0), None);
    }

    #[test]
    fn test_jump_is_one_based() {
        let pager = Pager::new(4, false, 0);
        assert_eq!(pager.jump(0, 3), Some(2));
        assert_eq!(pager.jump(0, 1), None);
        assert_eq!(pager.jump(0, 0), None);
        assert_eq!(pager.jump(0, 5), None);
    }
}
