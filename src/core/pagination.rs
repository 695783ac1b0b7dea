//! # Pagination
//!
//! Page selection over the derived country view. Nothing here is cached:
//! the reducer calls [`paginate`] after every change to the list or page.

use crate::gateway::Country;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    /// `ceil(len / items_per_page)`; zero for an empty list.
    pub total_pages: usize,
    /// 1-based, always within `1..=max(total_pages, 1)`.
    pub current_page: usize,
    pub page_items: Vec<Country>,
    pub items_per_page: usize,
}

impl Pagination {
    pub fn empty(items_per_page: usize) -> Self {
        Self {
            total_pages: 0,
            current_page: 1,
            page_items: Vec::new(),
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Selects `page` of `list`, clamping the page into range.
pub fn paginate(list: &[Country], page: usize, items_per_page: usize) -> Pagination {
    let per_page = items_per_page.max(1);
    let total_pages = list.len().div_ceil(per_page);
    let current_page = page.clamp(1, total_pages.max(1));
    let start = ((current_page - 1) * per_page).min(list.len());
    let end = (start + per_page).min(list.len());

    Pagination {
        total_pages,
        current_page,
        page_items: list[start..end].to_vec(),
        items_per_page: per_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::numbered_countries;

    #[test]
    fn test_first_page_of_25() {
        let list = numbered_countries(25);
        let page = paginate(&list, 1, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.page_items, list[0..10].to_vec());
    }

    #[test]
    fn test_last_page_is_partial() {
        let list = numbered_countries(25);
        let page = paginate(&list, 3, 10);
        assert_eq!(page.page_items, list[20..25].to_vec());
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_page_past_end_clamps_to_last() {
        let list = numbered_countries(25);
        let page = paginate(&list, 5, 10);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.page_items.len(), 5);
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        let list = numbered_countries(25);
        assert_eq!(paginate(&list, 0, 10).current_page, 1);
    }

    #[test]
    fn test_empty_list() {
        let page = paginate(&[], 4, 10);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
        assert!(page.page_items.is_empty());
        assert_eq!(page, Pagination::empty(10));
    }

    #[test]
    fn test_exact_multiple() {
        let list = numbered_countries(20);
        let page = paginate(&list, 2, 10);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page_items, list[10..20].to_vec());
    }

    #[test]
    fn test_paginate_is_idempotent() {
        let list = numbered_countries(37);
        for p in 0..6 {
            let first = paginate(&list, p, 10);
            let again = paginate(&list, first.current_page, 10);
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let list = numbered_countries(3);
        let page = paginate(&list, 2, 0);
        assert_eq!(page.items_per_page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_items, list[1..2].to_vec());
    }
}
