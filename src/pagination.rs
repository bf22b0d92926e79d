//! Pagination parameters for Chargify collection endpoints.

use serde::{Deserialize, Serialize};

/// Largest page size the API accepts.
pub const MAX_PER_PAGE: u32 = 200;

/// Query parameters for paginated requests.
///
/// Flattened into the list queries of paginated collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl PaginationParams {
    /// Create pagination params for a specific page.
    ///
    /// `per_page` is clamped to [`MAX_PER_PAGE`].
    #[must_use]
    pub fn for_page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page.min(MAX_PER_PAGE)),
        }
    }
}
