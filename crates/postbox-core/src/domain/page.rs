/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
}

/// Number of rows preceding `page`, or `None` if it does not fit in a `u64`.
pub fn page_offset(page: u64, per_page: u64) -> Option<u64> {
    page.saturating_sub(1).checked_mul(per_page)
}

impl<T> Page<T> {
    /// A page past the end of a listing of `total` items.
    pub fn empty(total: u64, page: u64, per_page: u64) -> Self {
        Self {
            items: Vec::new(),
            total,
            page,
            per_page,
        }
    }

    /// Last page number; an empty listing still has page 1.
    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page).max(1)
    }

    /// 1-based position of the first item on this page.
    pub fn first_item(&self) -> Option<u64> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.page.saturating_sub(1) * self.per_page + 1)
        }
    }

    /// 1-based position of the last item on this page.
    pub fn last_item(&self) -> Option<u64> {
        self.first_item().map(|first| first + self.items.len() as u64 - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
