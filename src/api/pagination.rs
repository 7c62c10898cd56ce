//! Page/size pagination over SQL `LIMIT ... OFFSET`.
//!
//! Pages are 0-indexed. Clients pick a size up to the configured maximum.

use serde::{Deserialize, Serialize};

/// Query parameters for paged listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (0-indexed).
    pub page: Option<u32>,
    /// Page size (default and max from config).
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn from_query(query: &PageQuery, default_size: u32, max_size: u32) -> Self {
        let size = query.size.unwrap_or(default_size).clamp(1, max_size.max(1));
        Self {
            page: query.page.unwrap_or(0),
            size,
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
}

impl PageMetadata {
    pub fn new(request: PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = total_elements.div_ceil(size);
        Self {
            size: request.size,
            total_elements,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            number: request.page,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    /// Index of the last page; 0 for an empty collection.
    pub fn last_page(&self) -> u32 {
        self.total_pages.saturating_sub(1)
    }
}

/// One page of results plus its metadata.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub metadata: PageMetadata,
}
