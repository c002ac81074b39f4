//! Pagination range calculator.
//!
//! Turns `(current page, total pages)` into the compact strip of page
//! buttons shown under the product grid:
//!
//! ```text
//! 1 2 3 4 5 6 7          (7 pages or fewer: every page)
//! 1 … 4 5 6 … 10         (current = 5 of 10)
//! 1 2 … 10               (current = 1 of 10)
//! ```

use std::fmt;

/// Strips with at most this many pages list every page.
const FULL_STRIP_MAX_PAGES: u32 = 7;

/// One entry of the page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(page) => write!(f, "{page}"),
            PageToken::Ellipsis => f.write_str("…"),
        }
    }
}

/// Number of pages needed for `total` items.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page strip for `current` out of `total_pages`.
///
/// Empty when there is at most one page, in which case the control is not
/// shown at all.
pub fn page_range(current: u32, total_pages: u32) -> Vec<PageToken> {
    if total_pages <= 1 {
        return Vec::new();
    }
    if total_pages <= FULL_STRIP_MAX_PAGES {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    let mut tokens = vec![PageToken::Page(1)];
    if current > 3 {
        tokens.push(PageToken::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total_pages - 1);
    tokens.extend((start..=end).map(PageToken::Page));

    if current < total_pages - 2 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.push(PageToken::Page(total_pages));
    tokens
}

/// Everything the pagination control needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    pub tokens: Vec<PageToken>,
}

impl Pagination {
    /// `None` when the result fits on a single page.
    pub fn new(current: u32, total: u64, page_size: u32) -> Option<Self> {
        let total_pages = total_pages(total, page_size);
        let tokens = page_range(current, total_pages);
        if tokens.is_empty() {
            return None;
        }
        Some(Self {
            current,
            total_pages,
            tokens,
        })
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.has_previous() { "‹" } else { " " })?;
        for token in &self.tokens {
            match token {
                PageToken::Page(page) if *page == self.current => write!(f, " [{page}]")?,
                other => write!(f, " {other}")?,
            }
        }
        f.write_str(if self.has_next() { " ›" } else { "  " })
    }
}
