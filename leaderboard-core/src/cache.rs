use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{ErrorInfo, FetchError};
use crate::models::{Entry, Page};
use crate::select::SourceKey;

pub const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Idle,
    LoadingInitial,
    LoadingMore,
    Refreshing,
    Error,
}

impl CacheStatus {
    /// True while a fetch is outstanding. The three loading states are
    /// mutually exclusive and each implies exactly one pending request.
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            CacheStatus::LoadingInitial | CacheStatus::LoadingMore | CacheStatus::Refreshing
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchKind {
    Initial,
    More,
    Refresh,
}

/// Ticket for one outstanding fetch, handed out by the begin-phase methods
/// and redeemed through [`PagedCache::complete`]. Captures the source and
/// epoch active at dispatch time so a late response for a superseded source
/// can be recognized and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub source: SourceKey,
    pub limit: u64,
    pub offset: u64,
    pub(crate) kind: FetchKind,
    pub(crate) epoch: u64,
}

/// Consumer-facing view of the cache, cloned out under the read lock so the
/// rendering layer never holds a reference into live state.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    pub source: Option<SourceKey>,
    pub entries: Vec<Entry>,
    pub status: CacheStatus,
    pub has_more: bool,
    pub last_error: Option<ErrorInfo>,
    pub meta: Option<serde_json::Value>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Offset-paginated aggregation cache over one of several mutually exclusive
/// remote sources.
///
/// The cache is a pure state machine: `initialize`/`load_more`/`refresh`
/// validate their guards and hand back a [`FetchRequest`] (or `None` for a
/// silent no-op), and the fetch outcome is applied through [`complete`].
/// All mutation is serialized through that completion path, which is what
/// keeps the at-most-one-outstanding-fetch discipline testable without a
/// network in sight.
///
/// [`complete`]: PagedCache::complete
#[derive(Debug, Clone)]
pub struct PagedCache {
    source: Option<SourceKey>,
    page_size: u64,
    offset: u64,
    entries: Vec<Entry>,
    has_more: bool,
    status: CacheStatus,
    last_error: Option<ErrorInfo>,
    meta: Option<serde_json::Value>,
    fetched_at: Option<DateTime<Utc>>,
    epoch: u64,
}

impl Default for PagedCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PagedCache {
    pub fn new() -> Self {
        Self {
            source: None,
            page_size: DEFAULT_PAGE_SIZE,
            offset: 0,
            entries: Vec::new(),
            has_more: false,
            status: CacheStatus::Idle,
            last_error: None,
            meta: None,
            fetched_at: None,
            epoch: 0,
        }
    }

    /// Activates `source`, requesting its first page.
    ///
    /// Idempotent for the source that is already active (returns `None`,
    /// nothing is disturbed). A different source discards the whole state:
    /// entries are cleared before any merge, the epoch is bumped so a
    /// still-in-flight response for the old source gets dropped on arrival.
    pub fn initialize(&mut self, source: SourceKey, page_size: u64) -> Option<FetchRequest> {
        if self.source == Some(source) {
            debug!(?source, "already initialized, ignoring");
            return None;
        }
        let page_size = if page_size == 0 {
            warn!("page_size must be positive, using default");
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        self.source = Some(source);
        self.page_size = page_size;
        self.offset = 0;
        self.entries.clear();
        self.has_more = false;
        self.status = CacheStatus::LoadingInitial;
        self.last_error = None;
        self.meta = None;
        self.fetched_at = None;
        self.epoch += 1;
        Some(FetchRequest {
            source,
            limit: page_size,
            offset: 0,
            kind: FetchKind::Initial,
            epoch: self.epoch,
        })
    }

    /// Requests the next page. Silent no-op while a fetch is outstanding
    /// (duplicate scroll-threshold events must not double-append) or when the
    /// source is exhausted. Permitted from `Error` so a failed load can be
    /// retried without losing what is already cached.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        let source = match self.source {
            Some(source) => source,
            None => return None,
        };
        if self.status.is_loading() {
            debug!("fetch already in flight, dropping load_more");
            return None;
        }
        if !self.has_more {
            debug!("no further pages, dropping load_more");
            return None;
        }
        self.status = CacheStatus::LoadingMore;
        Some(FetchRequest {
            source,
            limit: self.page_size,
            offset: self.offset + self.page_size,
            kind: FetchKind::More,
            epoch: self.epoch,
        })
    }

    /// Requests a full resync from offset 0. Existing entries stay visible
    /// until the new page lands (no flash-empty UI); on success they are
    /// replaced wholesale rather than merged. Silent no-op while a fetch is
    /// outstanding; permitted from `Error`.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        let source = match self.source {
            Some(source) => source,
            None => return None,
        };
        if self.status.is_loading() {
            debug!("fetch already in flight, dropping refresh");
            return None;
        }
        self.status = CacheStatus::Refreshing;
        Some(FetchRequest {
            source,
            limit: self.page_size,
            offset: 0,
            kind: FetchKind::Refresh,
            epoch: self.epoch,
        })
    }

    /// Applies the outcome of the fetch identified by `request`.
    ///
    /// A request from a superseded epoch is discarded: its source was
    /// replaced while it was in flight and its data must not leak into the
    /// current state.
    pub fn complete(&mut self, request: &FetchRequest, result: Result<Page, FetchError>) {
        if request.epoch != self.epoch {
            debug!(
                source = ?request.source,
                offset = request.offset,
                "discarding stale response from superseded epoch"
            );
            return;
        }
        if !self.status.is_loading() {
            debug!("completion without outstanding fetch, ignoring");
            return;
        }
        match result {
            Ok(page) => self.apply(request, page),
            Err(err) => {
                warn!(source = ?request.source, offset = request.offset, error = %err, "page fetch failed");
                self.last_error = Some(ErrorInfo::from(&err));
                self.status = CacheStatus::Error;
            }
        }
    }

    fn apply(&mut self, request: &FetchRequest, page: Page) {
        match request.kind {
            FetchKind::Initial | FetchKind::Refresh => {
                self.entries = page.entries;
                self.offset = 0;
            }
            FetchKind::More => {
                // Index existing rows by id; a boundary row the server sends
                // twice must not be appended again.
                let mut seen: HashSet<String> =
                    self.entries.iter().map(|e| e.id.clone()).collect();
                let fresh: Vec<Entry> = page
                    .entries
                    .into_iter()
                    .filter(|e| seen.insert(e.id.clone()))
                    .collect();
                self.entries.extend(fresh);
                self.offset += self.page_size;
            }
        }
        self.has_more = page.has_more;
        self.meta = page.meta;
        self.fetched_at = Some(Utc::now());
        self.last_error = None;
        self.status = CacheStatus::Idle;
    }

    /// First `n` entries in stored rank order, padded with `None` for the
    /// missing slots so podium layouts always get exactly `n` positions.
    /// Visual reordering of the podium (2nd/1st/3rd) is a rendering concern.
    pub fn top_n(&self, n: usize) -> Vec<Option<&Entry>> {
        (0..n).map(|i| self.entries.get(i)).collect()
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            source: self.source,
            entries: self.entries.clone(),
            status: self.status,
            has_more: self.has_more,
            last_error: self.last_error.clone(),
            meta: self.meta.clone(),
            fetched_at: self.fetched_at,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn status(&self) -> CacheStatus {
        self.status
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }

    pub fn meta(&self) -> Option<&serde_json::Value> {
        self.meta.as_ref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn source(&self) -> Option<SourceKey> {
        self.source
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }
}
