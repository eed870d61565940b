//! Offset pagination for the post listing.

/// Posts per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// A 1-based page number paired with a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Page numbers below 1 clamp to 1; a zero size becomes 1.
    pub fn new(page: i64, size: u32) -> Self {
        let page = u32::try_from(page.max(1)).unwrap_or(u32::MAX);
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Parse the raw `page` query value, falling back to the first page.
    pub fn from_query(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(1);
        Self::new(page, DEFAULT_PAGE_SIZE)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }

    /// The follow-up page, offered only when this one came back full.
    pub fn next_after(&self, returned: usize) -> Option<u32> {
        (returned >= self.size as usize).then(|| self.page.saturating_add(1))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}
