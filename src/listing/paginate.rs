//! Paginator

use serde::Serialize;
use std::num::NonZeroUsize;

/// Pagination state handed to the list renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// 1-based page number, exactly as requested
    pub current_page: usize,
    /// `ceil(len / page_size)`; zero for an empty listing
    pub total_pages: usize,
}

impl PaginationState {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One page of a listing
#[derive(Debug, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    pub posts: &'a [T],
    pub pagination: PaginationState,
}

/// Number of pages needed for `len` items
pub(crate) fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// Slice out page `page_number` (1-based) of `posts`.
///
/// A page outside `1..=total_pages` yields an empty slice rather than an
/// error, and `current_page` is reported as requested.
pub fn paginate<T>(posts: &[T], page_size: NonZeroUsize, page_number: usize) -> PageSlice<'_, T> {
    let size = page_size.get();
    let slice = page_number
        .checked_sub(1)
        .and_then(|prev| prev.checked_mul(size))
        .filter(|&start| start < posts.len())
        .map(|start| &posts[start..(start + size).min(posts.len())])
        .unwrap_or(&[]);

    PageSlice {
        posts: slice,
        pagination: PaginationState {
            current_page: page_number,
            total_pages: page_count(posts.len(), page_size),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_happy_case() {
        let items: Vec<u32> = (1..=13).collect();

        let page = paginate(&items, size(3), 1);
        assert_eq!(page.posts, &[1, 2, 3]);
        assert_eq!(page.pagination.total_pages, 5);
        assert_eq!(paginate(&items, size(3), 4).posts, &[10, 11, 12]);
        assert_eq!(paginate(&items, size(3), 5).posts, &[13]);
    }

    #[test]
    fn test_twelve_posts_page_two() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(&items, size(5), 2);
        assert_eq!(page.posts, &[6, 7, 8, 9, 10]);
        assert_eq!(
            page.pagination,
            PaginationState {
                current_page: 2,
                total_pages: 3
            }
        );
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(&items, size(5), 99);
        assert!(page.posts.is_empty());
        assert_eq!(page.pagination.current_page, 99);
        assert_eq!(page.pagination.total_pages, 3);

        let page = paginate(&items, size(5), 0);
        assert!(page.posts.is_empty());
        assert_eq!(page.pagination.current_page, 0);

        let page = paginate(&items, size(5), usize::MAX);
        assert!(page.posts.is_empty());
    }

    #[test]
    fn test_empty() {
        let items: Vec<u32> = vec![];
        let page = paginate(&items, size(5), 1);
        assert!(page.posts.is_empty());
        assert_eq!(
            page.pagination,
            PaginationState {
                current_page: 1,
                total_pages: 0
            }
        );
        assert!(!page.pagination.has_next());
        assert!(!page.pagination.has_prev());
    }

    #[test]
    fn test_pages_cover_input_in_order() {
        for len in 0..=17 {
            for k in 1..=6 {
                let items: Vec<usize> = (0..len).collect();
                let total = paginate(&items, size(k), 1).pagination.total_pages;
                let joined: Vec<usize> = (1..=total)
                    .flat_map(|p| paginate(&items, size(k), p).posts.to_vec())
                    .collect();
                assert_eq!(joined, items, "len={} k={}", len, k);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let items: Vec<u32> = (1..=7).collect();
        assert_eq!(paginate(&items, size(2), 3), paginate(&items, size(2), 3));
    }

    #[test]
    fn test_serializes_camel_case() {
        let state = PaginationState {
            current_page: 1,
            total_pages: 0,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json, serde_json::json!({"currentPage": 1, "totalPages": 0}));
    }
}
