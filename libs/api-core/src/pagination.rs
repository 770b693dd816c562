use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raw `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct PageParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Normalized page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPage {
    pub page: u64,
    pub limit: u64,
}

impl PageParams {
    /// Clamp to sane bounds: page >= 1, 1 <= limit <= max_limit.
    pub fn resolve(self, default_limit: u64, max_limit: u64) -> ResolvedPage {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, max_limit);
        ResolvedPage { page, limit }
    }
}

impl ResolvedPage {
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

/// Pagination envelope returned alongside list payloads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl PageMeta {
    pub fn new(resolved: ResolvedPage, total: u64) -> Self {
        Self {
            page: resolved.page,
            limit: resolved.limit,
            total,
            pages: total.div_ceil(resolved.limit),
        }
    }
}
