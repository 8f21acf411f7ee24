use shared::domain::{Page, PAGE_SIZE};

/// Half-open slice `[start, end)` of the combination set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRange {
    pub start: u64,
    pub end: u64,
}

impl ResultRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

pub fn range_for_page(page: Page, page_size: u64) -> ResultRange {
    let page = page.get();
    ResultRange {
        start: (page - 1).saturating_mul(page_size),
        end: page.saturating_mul(page_size),
    }
}

pub fn page_range(page: Page) -> ResultRange {
    range_for_page(page, PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(page_range(Page::FIRST), ResultRange { start: 0, end: 2000 });
    }

    #[test]
    fn range_follows_page_for_every_page() {
        for number in 1..=50u64 {
            let page = Page::new(number).expect("page");
            let range = page_range(page);
            assert_eq!(range.start, (number - 1) * 2000);
            assert_eq!(range.end, number * 2000);
            assert_eq!(range.len(), PAGE_SIZE);
        }
    }

    #[test]
    fn honours_custom_page_size() {
        let page = Page::new(3).expect("page");
        assert_eq!(range_for_page(page, 10), ResultRange { start: 20, end: 30 });
    }
}
