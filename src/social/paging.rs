//! Paginated aggregation: the "compute the ordered candidate set, slice a
//! page, report the total" pattern behind every listing.
//!
//! Two flavours exist:
//! - [`paginate`] materializes the full ordered candidate set in memory and
//!   slices it. Required when the ordering depends on computed fields
//!   (feed priority, suggestion degree).
//! - [`PageResult::from_store_page`] wraps a page the store already sliced,
//!   for plain listings whose sort key lives on the node (followers,
//!   following, a user's posts, comments, user directory).

use crate::error::SocialError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 100;

/// A validated page request (1-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as usize,
            page_size: DEFAULT_PAGE_SIZE as usize,
        }
    }
}

impl PageRequest {
    /// Validate a raw page request. Values <= 0 are rejected, not clamped.
    pub fn new(page: i64, page_size: i64) -> Result<Self, SocialError> {
        Self::bounded(page, page_size, DEFAULT_MAX_PAGE_SIZE)
    }

    /// Like [`PageRequest::new`] with an explicit upper bound on `page_size`
    pub fn bounded(page: i64, page_size: i64, max_page_size: i64) -> Result<Self, SocialError> {
        if page <= 0 {
            return Err(SocialError::InvalidInput(format!(
                "page must be positive, got {}",
                page
            )));
        }
        if page_size <= 0 {
            return Err(SocialError::InvalidInput(format!(
                "page_size must be positive, got {}",
                page_size
            )));
        }
        if page_size > max_page_size {
            return Err(SocialError::InvalidInput(format!(
                "page_size cannot exceed {}",
                max_page_size
            )));
        }
        Ok(Self {
            page: page as usize,
            page_size: page_size as usize,
        })
    }

    /// Resolve optional query parameters, defaulting to page 1 and `default_page_size`
    pub fn from_optional(
        page: Option<i64>,
        page_size: Option<i64>,
        default_page_size: i64,
        max_page_size: i64,
    ) -> Result<Self, SocialError> {
        Self::bounded(
            page.unwrap_or(DEFAULT_PAGE),
            page_size.unwrap_or(default_page_size),
            max_page_size,
        )
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of items to skip: `(page - 1) * page_size`
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Maximum number of items in the page
    pub fn limit(&self) -> usize {
        self.page_size
    }
}

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub page: usize,
    pub page_size: usize,
    /// Size of the full candidate set, independent of slicing
    pub total: usize,
    pub results: Vec<T>,
}

impl<T> PageResult<T> {
    /// Wrap a page already sliced by the store
    pub fn from_store_page(request: PageRequest, results: Vec<T>, total: usize) -> Self {
        Self {
            page: request.page(),
            page_size: request.page_size(),
            total,
            results,
        }
    }
}

/// Slice a fully materialized, already ordered candidate set.
pub fn paginate<T>(candidates: Vec<T>, request: PageRequest) -> PageResult<T> {
    let total = candidates.len();
    let results = candidates
        .into_iter()
        .skip(request.offset())
        .take(request.limit())
        .collect();
    PageResult::from_store_page(request, results, total)
}
