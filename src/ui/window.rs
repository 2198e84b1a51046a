//! Scroll window computation.
//!
//! Given the cursor, the previous offset, the page size and the number of
//! (filtered) items, [`Window::compute`] clamps cursor and offset and decides
//! which slice of the list is visible. One row is reserved for a "more above"
//! indicator when the list is scrolled down, and one for "more below" when
//! items follow the page, so the rendered rows never exceed the page size.
//!
//! The offset also looks one row ahead: when the cursor lands on the last row
//! of the page and more items follow, the page advances by one, and when it
//! lands on the first row of a scrolled page, the page backs up by one. A
//! single-row page has no room to look ahead and simply follows the cursor.

use std::ops::Range;

/// Clamped cursor/offset and the visible slice they imply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Cursor clamped into `[0, len - 1]` (0 for an empty list).
    pub cursor: usize,
    /// First row of the page, before indicator reservation.
    pub offset: usize,
    /// A "more above" row is shown.
    pub scroll_up: bool,
    /// A "more below" row is shown.
    pub scroll_down: bool,
    /// Index of the first visible item.
    pub start: usize,
    /// One past the index of the last visible item.
    pub end: usize,
}

impl Window {
    /// Clamps `cursor` and `offset` for a list of `len` items shown `page_size`
    /// rows at a time.
    ///
    /// A `page_size` of 0 is treated as 1.
    #[must_use]
    pub fn compute(cursor: usize, offset: usize, page_size: usize, len: usize) -> Self {
        let page_size = page_size.max(1);

        let cursor = cursor.min(len.saturating_sub(1));

        let mut offset = offset
            .min(cursor)
            .max((cursor + 1).saturating_sub(page_size));

        if page_size > 1 && cursor - offset == page_size - 1 && cursor + 1 < len {
            offset += 1;
        }

        if page_size > 1 && cursor == offset && cursor > 0 {
            offset -= 1;
        }

        let scroll_up = offset > 0;
        let scroll_down = offset + page_size < len;

        let start = offset + usize::from(scroll_up);
        let end = (offset + page_size - usize::from(scroll_down)).min(len);

        Self {
            cursor,
            offset,
            scroll_up,
            scroll_down,
            start,
            end: end.max(start),
        }
    }

    /// Indices of the visible items.
    #[must_use]
    pub const fn visible(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of rows drawn for the list: visible items plus indicators.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.end - self.start + self.scroll_up as usize + self.scroll_down as usize
    }

    /// Returns `true` if the cursor's item is among the visible rows.
    #[must_use]
    pub const fn cursor_visible(&self) -> bool {
        self.cursor >= self.start && self.cursor < self.end
    }
}
