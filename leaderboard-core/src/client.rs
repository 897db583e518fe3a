use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{CacheSnapshot, FetchRequest, PagedCache};
use crate::config::ClientConfig;
use crate::fetch::{PageFetcher, PageQuery};
use crate::models::Entry;
use crate::select::{active_source, SourceKey, ViewerContext};

/// Consumer-facing leaderboard handle: one [`PagedCache`] wired to a
/// [`PageFetcher`], constructed per active view and passed to whatever
/// consumes it. No ambient singleton.
///
/// Each operation begins under a short write lock, performs the network
/// fetch with the lock released, then reacquires it to apply the outcome.
/// The begin-phase guard is what collapses concurrent `load_more` calls into
/// a single dispatch, and the epoch carried by the ticket is what drops a
/// stale response when `initialize` switches source mid-flight.
#[derive(Clone)]
pub struct Leaderboard {
    cache: Arc<RwLock<PagedCache>>,
    fetcher: Arc<dyn PageFetcher>,
    config: ClientConfig,
}

impl Leaderboard {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: ClientConfig) -> Self {
        Self {
            cache: Arc::new(RwLock::new(PagedCache::new())),
            fetcher,
            config,
        }
    }

    /// Resolves the active source for `ctx` and initializes on it. Returns
    /// the source that was selected, or `None` when no leaderboard serves
    /// this role/view-mode combination (the cache is left untouched).
    pub async fn activate(&self, ctx: &ViewerContext) -> Option<SourceKey> {
        let source = active_source(ctx)?;
        self.initialize(source).await;
        Some(source)
    }

    /// Activates `source` and fetches its first page. No-op when `source` is
    /// already active.
    pub async fn initialize(&self, source: SourceKey) {
        let request = self
            .cache
            .write()
            .await
            .initialize(source, self.config.page_size);
        if let Some(request) = request {
            self.run(request).await;
        }
    }

    /// Fetches the next page and appends it. Dropped silently while another
    /// fetch is outstanding or when the source is exhausted.
    pub async fn load_more(&self) {
        let request = self.cache.write().await.load_more();
        if let Some(request) = request {
            self.run(request).await;
        }
    }

    /// Resyncs from offset 0, replacing cached entries wholesale on success.
    pub async fn refresh(&self) {
        let request = self.cache.write().await.refresh();
        if let Some(request) = request {
            self.run(request).await;
        }
    }

    async fn run(&self, request: FetchRequest) {
        let query = PageQuery {
            limit: request.limit,
            offset: request.offset,
            sort_by: self.config.sort_by.clone(),
            class_level: self.config.class_level.clone(),
        };
        // The lock is not held across the await: completions reacquire it and
        // are serialized, stale ones are dropped by epoch.
        let result = self.fetcher.fetch_page(request.source, &query).await;
        self.cache.write().await.complete(&request, result);
    }

    pub async fn snapshot(&self) -> CacheSnapshot {
        self.cache.read().await.snapshot()
    }

    /// Podium slots: exactly `n` positions in rank order, `None` where the
    /// board has fewer entries.
    pub async fn top_n(&self, n: usize) -> Vec<Option<Entry>> {
        let cache = self.cache.read().await;
        cache.top_n(n).into_iter().map(|e| e.cloned()).collect()
    }
}
