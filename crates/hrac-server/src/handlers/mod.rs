//! HTTP handlers: thin parse → repository → JSON glue.

pub mod audit;
pub mod permissions;
pub mod roles;
pub mod users;

use hrac_core::repository::Pagination;
use serde::Deserialize;

/// Common `?offset=&limit=` query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let default = Pagination::default();
        Pagination {
            offset: q.offset.unwrap_or(default.offset),
            limit: q.limit.unwrap_or(default.limit),
        }
    }
}
