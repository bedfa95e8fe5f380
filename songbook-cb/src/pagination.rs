//! Pagination utilities
//!
//! One slicing rule shared by the song listing and the search results.
//! Pages are 1-indexed; a requested page that is below 1 or past the last
//! page is coerced to page 1 instead of being reported as an error.

use serde::Serialize;
use std::num::NonZeroUsize;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed, after coercion)
    pub page: usize,
    /// Total number of pages (0 when there are no results)
    pub total_pages: usize,
    /// Index of the first item on the page
    pub offset: usize,
}

/// Calculate pagination metadata from total results and requested page
///
/// `total_pages = ceil(total_results / page_size)`. Out-of-range requests
/// land on page 1, not on the nearest valid page.
///
/// # Examples
/// ```
/// use songbook_cb::pagination::calculate_pagination;
/// use std::num::NonZeroUsize;
///
/// let size = NonZeroUsize::new(5).unwrap();
///
/// // 12 results = 3 pages (5 + 5 + 2)
/// let p = calculate_pagination(12, 2, size);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 5);
///
/// // Past the end goes back to the first page
/// let p = calculate_pagination(12, 99, size);
/// assert_eq!(p.page, 1);
/// assert_eq!(p.offset, 0);
/// ```
pub fn calculate_pagination(
    total_results: usize,
    requested_page: i64,
    page_size: NonZeroUsize,
) -> Pagination {
    let page_size = page_size.get();
    let total_pages = total_results.div_ceil(page_size);

    let page = match usize::try_from(requested_page) {
        Ok(page) if (1..=total_pages).contains(&page) => page,
        _ => 1,
    };
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

/// Slice one page out of an ordered sequence
///
/// The final page may be short; nothing is padded and the input order is
/// kept.
pub fn paginate<T>(items: &[T], requested_page: i64, page_size: NonZeroUsize) -> &[T] {
    let p = calculate_pagination(items.len(), requested_page, page_size);
    let end = (p.offset + page_size.get()).min(items.len());
    &items[p.offset.min(end)..end]
}

/// One page of results plus the numbers needed to render page links
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_results: usize,
}

impl<T: Clone> Page<T> {
    /// Take the requested page out of a full result set
    pub fn from_results(results: Vec<T>, requested_page: i64, page_size: NonZeroUsize) -> Self {
        let total_results = results.len();
        let p = calculate_pagination(total_results, requested_page, page_size);

        Self {
            items: paginate(&results, requested_page, page_size).to_vec(),
            current_page: p.page,
            total_pages: p.total_pages,
            total_results,
        }
    }
}
