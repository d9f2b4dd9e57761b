//! Query DTOs - Data Transfer Objects per query di ricerca e paginazione

use serde::{Deserialize, Serialize};

/// Query `?term=` usata dagli endpoint di ricerca
#[derive(Serialize, Deserialize, Debug)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

/// Query di paginazione; pagine numerate da 1
#[derive(Serialize, Deserialize, Debug)]
pub struct PaginationQuery {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl PaginationQuery {
    pub const MAX_PAGE_SIZE: i64 = 100;

    /// Returns (limit, offset) clamped to sane bounds.
    pub fn limit_offset(&self) -> (i64, i64) {
        let size = self.page_size.clamp(1, Self::MAX_PAGE_SIZE);
        let page = self.page_number.max(1);
        (size, (page - 1).saturating_mul(size))
    }
}

fn default_user_page_size() -> i64 {
    10
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserListQuery {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_user_page_size")]
    pub page_size: i64,
    pub role: Option<String>,
}

impl UserListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_offset_clamps_values() {
        let q = PaginationQuery { page_number: 3, page_size: 20 };
        assert_eq!(q.limit_offset(), (20, 40));

        let q = PaginationQuery { page_number: 0, page_size: 1000 };
        assert_eq!(q.limit_offset(), (100, 0));
    }

    #[test]
    fn limit_offset_saturates_huge_pages() {
        let q = PaginationQuery { page_number: i64::MAX, page_size: 20 };
        assert_eq!(q.limit_offset(), (20, i64::MAX));
    }
}
