//! List pagination.
//!
//! Pure helpers that pick which slice of a choice list is visible. The window
//! follows the active index and stops at both ends of the list; it never
//! wraps around.

use std::ops::Range;

/// Rows shown before the list starts scrolling.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Offset of the first visible row after moving the active index.
///
/// `offset` is the previous offset. The result keeps `active` inside
/// `[offset, offset + page_size)` and never scrolls past the last full page.
pub fn follow(offset: usize, active: usize, len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    if len <= page_size {
        return 0;
    }

    let mut offset = offset.min(len - page_size);
    if active < offset {
        offset = active;
    } else if active >= offset + page_size {
        offset = active + 1 - page_size;
    }
    offset.min(len - page_size)
}

/// Index range visible at `offset`.
pub fn window(offset: usize, len: usize, page_size: usize) -> Range<usize> {
    let start = offset.min(len);
    let end = (start + page_size.max(1)).min(len);
    start..end
}

/// One rendered page of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<L> {
    pub offset: usize,
    pub lines: Vec<L>,
    /// Whether rows exist outside the visible window.
    pub truncated: bool,
}

/// Render the visible window of `items`.
///
/// `render` receives each visible item with its absolute index and whether it
/// is the active row.
pub fn paginate<T, L, F>(
    items: &[T],
    active: usize,
    page_size: usize,
    previous_offset: usize,
    mut render: F,
) -> Page<L>
where
    F: FnMut(&T, usize, bool) -> L,
{
    let offset = follow(previous_offset, active, items.len(), page_size);
    let range = window(offset, items.len(), page_size);
    let lines = items[range.clone()]
        .iter()
        .zip(range)
        .map(|(item, index)| render(item, index, index == active))
        .collect();

    Page {
        offset,
        lines,
        truncated: items.len() > page_size.max(1),
    }
}
