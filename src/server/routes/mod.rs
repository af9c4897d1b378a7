//! HTTP route modules

pub mod performance;

use serde::Deserialize;

/// Query parameters for list endpoints.
///
/// Behind the pagination middleware `limit` and `sort` are always present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// `field:direction`
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

fn default_sort() -> String {
    "createdAt:desc".to_string()
}

impl ListQuery {
    /// Offset for database queries
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Split `sort` into field and descending flag
    pub fn sort_order(&self) -> (&str, bool) {
        match self.sort.split_once(':') {
            Some((field, direction)) => (field, direction.eq_ignore_ascii_case("desc")),
            None => (self.sort.as_str(), false),
        }
    }
}
