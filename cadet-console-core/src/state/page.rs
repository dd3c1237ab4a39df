use serde::Serialize;

/// One button of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageLink {
    Page { number: u32, current: bool },
    /// Rendered as an ellipsis.
    Gap,
}

/// Current page, page size and total item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl PageState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Pull `page` into `[1, total_pages]`.
    pub fn clamp(&mut self) {
        self.page = self.page.clamp(1, self.total_pages().max(1));
    }

    /// 1-based positions of the first and last item on this page, or `None`
    /// for an empty list.
    pub fn range(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let start = self.offset() + 1;
        let end = (self.offset() + u64::from(self.page_size)).min(self.total);
        (start <= end).then_some((start, end))
    }

    /// "Showing 11 to 20 of 42 schools".
    pub fn summary(&self, noun: &str) -> String {
        match self.range() {
            Some((start, end)) => format!("Showing {start} to {end} of {} {noun}", self.total),
            None => format!("No {noun}"),
        }
    }

    /// First, last and the pages next to the current one, with a gap marker
    /// two steps out. Empty when everything fits on one page.
    pub fn window(&self) -> Vec<PageLink> {
        let last = self.total_pages();
        if last <= 1 {
            return Vec::new();
        }
        let current = self.page;
        (1..=last)
            .filter_map(|n| {
                if n == 1 || n == last || n.abs_diff(current) <= 1 {
                    Some(PageLink::Page {
                        number: n,
                        current: n == current,
                    })
                } else if n.abs_diff(current) == 2 {
                    Some(PageLink::Gap)
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u32, total: u64) -> PageState {
        PageState {
            page,
            page_size: 10,
            total,
        }
    }

    fn numbers(links: &[PageLink]) -> Vec<Option<u32>> {
        links
            .iter()
            .map(|l| match l {
                PageLink::Page { number, .. } => Some(*number),
                PageLink::Gap => None,
            })
            .collect()
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(page(1, 0).total_pages(), 0);
        assert_eq!(page(1, 10).total_pages(), 1);
        assert_eq!(page(1, 11).total_pages(), 2);
    }

    #[test]
    fn showing_range() {
        assert_eq!(page(2, 25).summary("schools"), "Showing 11 to 20 of 25 schools");
        assert_eq!(page(3, 25).range(), Some((21, 25)));
        assert_eq!(page(1, 0).summary("schools"), "No schools");
    }

    #[test]
    fn window_hidden_for_single_page() {
        assert!(page(1, 7).window().is_empty());
    }

    #[test]
    fn window_middle_page() {
        let links = page(5, 100).window();
        assert_eq!(
            numbers(&links),
            vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(10)]
        );
        assert!(links.contains(&PageLink::Page { number: 5, current: true }));
    }

    #[test]
    fn window_near_start_has_no_leading_gap() {
        assert_eq!(
            numbers(&page(2, 100).window()),
            vec![Some(1), Some(2), Some(3), None, Some(10)]
        );
        assert_eq!(
            numbers(&page(3, 100).window()),
            vec![Some(1), Some(2), Some(3), Some(4), None, Some(10)]
        );
    }

    #[test]
    fn clamp_keeps_page_in_bounds() {
        let mut state = page(7, 25);
        state.clamp();
        assert_eq!(state.page, 3);
        let mut empty = page(4, 0);
        empty.clamp();
        assert_eq!(empty.page, 1);
    }
}
