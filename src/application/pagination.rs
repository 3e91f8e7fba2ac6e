//! Offset pagination with a fixed system-wide page size.

use serde::Serialize;

/// Every feed scope pages by ten. This is deliberately a constant, not
/// per-scope configuration.
pub const PAGE_SIZE: u32 = 10;

/// A clamped slice of an ordered sequence: which rows to fetch and where
/// the page sits in the whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u32,
    pub offset: u64,
    pub limit: u32,
    pub total_pages: u32,
}

impl PageWindow {
    /// Build the window for `requested` over `total_items` rows.
    ///
    /// A request below 1 or past the last page clamps to the nearest valid
    /// page instead of erroring. An empty sequence still has one page.
    pub fn clamped(total_items: u64, requested: u32) -> Self {
        let total_pages = total_pages(total_items);
        let number = requested.clamp(1, total_pages);
        Self {
            number,
            offset: u64::from(number - 1) * u64::from(PAGE_SIZE),
            limit: PAGE_SIZE,
            total_pages,
        }
    }
}

fn total_pages(total_items: u64) -> u32 {
    let pages = total_items.div_ceil(u64::from(PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of an ordered sequence plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Wrap rows fetched for `window` into a page.
    pub fn assemble(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            number: window.number,
            total_pages: window.total_pages,
            has_next: window.number < window.total_pages,
            has_previous: window.number > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}
