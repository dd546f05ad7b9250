//! Search, category filter and pagination over the in-memory catalog.
//!
//! Everything here is pure: the store owns the item list and a
//! [`FilterState`], and derives its views through these functions.

use std::ops::RangeInclusive;

use techstore_core::Item;

/// Items per page.
pub const PAGE_SIZE: usize = 8;

/// Page numbers shown at once in a pager.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Category selection: everything, or one concrete category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Interpret user input. Blank input and `all` (any case) select every
    /// category.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(raw.to_string())
        }
    }

    /// Exact, case-insensitive category match.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => item.category.to_lowercase() == category.to_lowercase(),
        }
    }
}

/// Current search term, category and page. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    category: CategoryFilter,
    page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            page: 1,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn category(&self) -> &CategoryFilter {
        &self.category
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Replace the search term and go back to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Replace the category and go back to page 1.
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.page = 1;
    }

    pub(crate) const fn set_page_unchecked(&mut self, page: usize) {
        self.page = page;
    }

    /// Whether an item passes both the category and the search filter.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        self.category.matches(item) && matches_search(item, &self.search)
    }
}

/// Case-insensitive substring match over name, description, category and
/// brand. An empty term matches every item.
#[must_use]
pub fn matches_search(item: &Item, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    [
        Some(item.name.as_str()),
        Some(item.description.as_str()),
        Some(item.category.as_str()),
        item.brand.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Number of pages needed for `count` items.
#[must_use]
pub const fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// The window of `items` shown on a 1-based `page`. Out-of-range pages are
/// empty.
#[must_use]
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Page numbers to show in a pager: every page when there are at most
/// [`MAX_VISIBLE_PAGES`], otherwise a window around `current` kept inside
/// `1..=total`.
#[must_use]
pub fn page_window(current: usize, total: usize) -> RangeInclusive<usize> {
    if total <= MAX_VISIBLE_PAGES {
        return 1..=total;
    }
    let start = current.saturating_sub(2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total);
    let start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
    start..=end
}

/// "Showing `first` - `last` of `total_items`" for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// 1-based position of the first item shown, 0 when nothing is shown.
    pub first: usize,
    /// 1-based position of the last item shown, 0 when nothing is shown.
    pub last: usize,
    pub total_items: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl PageSummary {
    #[must_use]
    pub fn new(page: usize, total_items: usize) -> Self {
        let last = page.saturating_mul(PAGE_SIZE).min(total_items);
        let first = page.saturating_sub(1) * PAGE_SIZE + 1;
        let (first, last) = if first > last { (0, 0) } else { (first, last) };
        Self {
            first,
            last,
            total_items,
            page,
            total_pages: total_pages(total_items),
        }
    }

    /// Pagination controls are hidden for zero or one page.
    #[must_use]
    pub const fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }
}
