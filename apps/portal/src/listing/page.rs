use serde::{Deserialize, Serialize};

/// Number of pager buttons shown around the current page.
pub const PAGER_WINDOW: usize = 5;

/// Card layout of the listing page. Each layout has its own page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingLayout {
    #[default]
    Grid,
    List,
}

impl ListingLayout {
    pub fn page_size(self) -> usize {
        match self {
            ListingLayout::Grid => 20,
            ListingLayout::List => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Slices out 1-based page `page`. Page 0, a page past the end, or a zero page
/// size all yield an empty slice; `total` is always the input length.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    Page {
        items: page_range(items.len(), page, page_size)
            .map(|range| items[range].to_vec())
            .unwrap_or_default(),
        total: items.len(),
    }
}

/// Index range of 1-based `page` within `total` items, if it has any.
pub fn page_range(total: usize, page: usize, page_size: usize) -> Option<std::ops::Range<usize>> {
    if page == 0 || page_size == 0 {
        return None;
    }
    let start = (page - 1).checked_mul(page_size)?;
    if start >= total {
        return None;
    }
    Some(start..total.min(start + page_size))
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Pager controls for the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagerWindow {
    pub pages: Vec<usize>,
    pub current: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// The pager is hidden when everything fits on one page.
    pub visible: bool,
}

impl PagerWindow {
    /// Up to [`PAGER_WINDOW`] consecutive pages centred on `current`, shifted to
    /// stay within `1..=total_pages`.
    pub fn new(current: usize, total_pages: usize) -> Self {
        let pages = if total_pages == 0 {
            Vec::new()
        } else {
            let half = PAGER_WINDOW / 2;
            let mut start = current.saturating_sub(half).max(1);
            let end = (start + PAGER_WINDOW - 1).min(total_pages);
            if end + 1 - start < PAGER_WINDOW {
                start = (end + 1).saturating_sub(PAGER_WINDOW).max(1);
            }
            (start..=end).collect()
        };

        Self {
            pages,
            current,
            total_pages,
            has_prev: current > 1,
            has_next: current < total_pages,
            visible: total_pages > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_three_records_in_grid() {
        let items: Vec<u32> = (1..=23).collect();
        let size = ListingLayout::Grid.page_size();
        assert_eq!(paginate(&items, 1, size).items.len(), 20);
        assert_eq!(paginate(&items, 2, size).items, vec![21, 22, 23]);
        assert!(paginate(&items, 3, size).items.is_empty());
        assert_eq!(paginate(&items, 3, size).total, 23);
        assert_eq!(total_pages(23, size), 2);
    }

    #[test]
    fn test_list_layout_page_size() {
        let items: Vec<u32> = (1..=25).collect();
        let size = ListingLayout::List.page_size();
        assert_eq!(paginate(&items, 3, size).items, vec![25]);
        assert_eq!(total_pages(25, size), 3);
    }

    #[test]
    fn test_page_zero_and_zero_size_are_empty() {
        let items = vec![1, 2, 3];
        assert!(paginate(&items, 0, 20).items.is_empty());
        assert!(paginate(&items, 1, 0).items.is_empty());
        assert_eq!(total_pages(3, 0), 0);
    }

    #[test]
    fn test_pages_partition_the_input() {
        let items: Vec<u32> = (0..47).collect();
        for size in [1, 5, 12, 20, 47, 100] {
            let mut joined = Vec::new();
            for page in 1..=total_pages(items.len(), size) {
                joined.extend(paginate(&items, page, size).items);
            }
            assert_eq!(joined, items, "page size {size}");
        }
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let items = vec![1];
        assert!(paginate(&items, usize::MAX, usize::MAX).items.is_empty());
    }

    #[test]
    fn test_pager_window_centres_and_clamps() {
        assert_eq!(PagerWindow::new(1, 10).pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(PagerWindow::new(6, 10).pages, vec![4, 5, 6, 7, 8]);
        assert_eq!(PagerWindow::new(10, 10).pages, vec![6, 7, 8, 9, 10]);
        assert_eq!(PagerWindow::new(2, 3).pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_pager_flags() {
        let single = PagerWindow::new(1, 1);
        assert!(!single.visible);
        assert!(!single.has_prev && !single.has_next);

        let middle = PagerWindow::new(2, 3);
        assert!(middle.visible && middle.has_prev && middle.has_next);

        let empty = PagerWindow::new(1, 0);
        assert!(empty.pages.is_empty());
        assert!(!empty.visible);
    }
}
