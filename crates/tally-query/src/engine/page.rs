//! Page windows.

use std::ops::Range;

use tally_core::PageSize;

/// Index range of a 1-indexed page over `len` rows.
///
/// Page 0 is read as page 1. Pages past the end give an empty range.
pub fn page_range(len: usize, page: usize, page_size: PageSize) -> Range<usize> {
    match page_size.limit() {
        None => 0..len,
        Some(size) => {
            let start = page.max(1).saturating_sub(1).saturating_mul(size).min(len);
            let end = start.saturating_add(size).min(len);
            start..end
        }
    }
}

/// Slice of rows on one page.
pub fn paginate<T>(rows: &[T], page: usize, page_size: PageSize) -> &[T] {
    &rows[page_range(rows.len(), page, page_size)]
}

/// Number of pages needed for `matched` rows.
pub fn total_pages(matched: usize, page_size: PageSize) -> usize {
    match page_size.limit() {
        None => usize::from(matched > 0),
        Some(size) => matched.div_ceil(size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_pages() {
        let rows: Vec<u32> = (1..=7).collect();
        let size = PageSize::rows(3);
        assert_eq!(paginate(&rows, 1, size), &[1, 2, 3]);
        assert_eq!(paginate(&rows, 3, size), &[7]);
        assert_eq!(total_pages(rows.len(), size), 3);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let rows: Vec<u32> = (1..=4).collect();
        assert!(paginate(&rows, 9, PageSize::rows(2)).is_empty());
        assert!(paginate(&rows, usize::MAX, PageSize::rows(2)).is_empty());
    }

    #[test]
    fn test_page_zero_reads_as_first() {
        let rows = vec!["a", "b", "c"];
        assert_eq!(paginate(&rows, 0, PageSize::rows(2)), &["a", "b"]);
    }

    #[test]
    fn test_all_is_single_page() {
        let rows: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&rows, 1, PageSize::All).len(), 25);
        assert_eq!(total_pages(25, PageSize::All), 1);
        assert_eq!(total_pages(0, PageSize::All), 0);
    }

    #[test]
    fn test_empty_has_no_pages() {
        let rows: Vec<u32> = Vec::new();
        assert_eq!(total_pages(0, PageSize::rows(10)), 0);
        assert!(paginate(&rows, 1, PageSize::rows(10)).is_empty());
    }
}
