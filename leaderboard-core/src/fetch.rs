use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::Page;
use crate::select::SourceKey;

/// Parameters of one page request. All three sources honor identical
/// offset-based pagination semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: u64,
    pub offset: u64,
    pub sort_by: Option<String>,
    pub class_level: Option<String>,
}

/// Routes a page request to the endpoint backing `source`.
///
/// Implementations must reject with a [`FetchError`] on any transport or
/// server failure rather than returning a malformed page, so the cache's
/// failure path stays exercisable.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, source: SourceKey, query: &PageQuery) -> Result<Page, FetchError>;
}
