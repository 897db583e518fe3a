use leaderboard_core::{
    CacheStatus, Entry, ErrorKind, FetchError, Page, PagedCache, SourceKey, DEFAULT_PAGE_SIZE,
};

fn entry(id: &str, score: f64) -> Entry {
    Entry {
        id: id.into(),
        name: id.to_uppercase(),
        rank: None,
        score,
        finished: None,
    }
}

fn page(ids: &[&str], has_more: bool) -> Page {
    Page {
        entries: ids.iter().map(|id| entry(id, 10.0)).collect(),
        has_more,
        next_offset: 0,
        meta: None,
    }
}

fn ids(cache: &PagedCache) -> Vec<&str> {
    cache.entries().iter().map(|e| e.id.as_str()).collect()
}

/// Drives the cache to an idle state with the given first page.
fn initialized(source: SourceKey, first_page: Page) -> PagedCache {
    let mut cache = PagedCache::new();
    let req = cache.initialize(source, 3).expect("first initialize dispatches");
    cache.complete(&req, Ok(first_page));
    cache
}

#[test]
fn initialize_fetches_offset_zero_and_applies_first_page() {
    let mut cache = PagedCache::new();
    let req = cache.initialize(SourceKey::Global, 3).unwrap();
    assert_eq!(req.offset, 0);
    assert_eq!(req.limit, 3);
    assert_eq!(cache.status(), CacheStatus::LoadingInitial);

    cache.complete(&req, Ok(page(&["a", "b", "c"], true)));
    assert_eq!(cache.status(), CacheStatus::Idle);
    assert_eq!(ids(&cache), ["a", "b", "c"]);
    assert!(cache.has_more());
    assert_eq!(cache.offset(), 0);
    assert!(cache.fetched_at().is_some());
}

#[test]
fn initialize_is_idempotent_for_the_active_source() {
    let mut cache = initialized(SourceKey::Global, page(&["a"], false));
    assert!(cache.initialize(SourceKey::Global, 3).is_none());
    assert_eq!(ids(&cache), ["a"]);

    // Also a no-op while the first fetch is still in flight.
    let mut cache = PagedCache::new();
    let _req = cache.initialize(SourceKey::Global, 3).unwrap();
    assert!(cache.initialize(SourceKey::Global, 3).is_none());
}

#[test]
fn zero_page_size_falls_back_to_default() {
    let mut cache = PagedCache::new();
    let req = cache.initialize(SourceKey::Global, 0).unwrap();
    assert_eq!(req.limit, DEFAULT_PAGE_SIZE);
}

#[test]
fn load_more_appends_and_advances_offset_by_page_size() {
    let mut cache = initialized(SourceKey::Global, page(&["a", "b", "c"], true));

    let req = cache.load_more().unwrap();
    assert_eq!(req.offset, 3);
    assert_eq!(cache.status(), CacheStatus::LoadingMore);

    cache.complete(&req, Ok(page(&["d", "e"], true)));
    assert_eq!(ids(&cache), ["a", "b", "c", "d", "e"]);
    assert_eq!(cache.offset(), 3);

    let req = cache.load_more().unwrap();
    assert_eq!(req.offset, 6);
    cache.complete(&req, Ok(page(&["f"], false)));
    assert_eq!(cache.offset(), 6);
    assert!(!cache.has_more());
}

#[test]
fn load_more_drops_overlapping_boundary_entries() {
    let mut cache = initialized(SourceKey::Global, page(&["a", "b", "c"], true));
    let req = cache.load_more().unwrap();
    // Server returns the boundary row "c" again plus a within-page duplicate.
    cache.complete(&req, Ok(page(&["c", "d", "d", "e"], false)));
    assert_eq!(ids(&cache), ["a", "b", "c", "d", "e"]);
}

#[test]
fn load_more_is_dropped_while_a_fetch_is_outstanding() {
    let mut cache = initialized(SourceKey::Global, page(&["a"], true));
    let first = cache.load_more().unwrap();
    assert!(cache.load_more().is_none());
    assert!(cache.refresh().is_none());

    cache.complete(&first, Ok(page(&["b"], true)));
    assert_eq!(ids(&cache), ["a", "b"]);
}

#[test]
fn load_more_is_dropped_when_exhausted() {
    let mut cache = initialized(SourceKey::Global, page(&["a"], false));
    assert!(cache.load_more().is_none());
}

#[test]
fn refresh_keeps_entries_visible_then_replaces_wholesale() {
    let mut cache = initialized(SourceKey::Global, page(&["a", "b", "c"], true));
    let more = cache.load_more().unwrap();
    cache.complete(&more, Ok(page(&["d"], true)));
    assert_eq!(cache.offset(), 3);

    let req = cache.refresh().unwrap();
    assert_eq!(req.offset, 0);
    assert_eq!(cache.status(), CacheStatus::Refreshing);
    // No flash-empty: the stale list stays visible during the fetch.
    assert_eq!(ids(&cache), ["a", "b", "c", "d"]);

    cache.complete(&req, Ok(page(&["x", "y"], true)));
    assert_eq!(ids(&cache), ["x", "y"]);
    assert_eq!(cache.offset(), 0);

    // Pagination restarts from the fresh baseline.
    let more = cache.load_more().unwrap();
    assert_eq!(more.offset, 3);
}

#[test]
fn failed_load_more_retains_entries_and_offset() {
    let mut cache = initialized(SourceKey::Global, page(&["a", "b", "c"], true));
    let req = cache.load_more().unwrap();
    let before = cache.fetched_at();
    cache.complete(&req, Err(FetchError::Status { status: 502 }));

    assert_eq!(cache.status(), CacheStatus::Error);
    assert_eq!(ids(&cache), ["a", "b", "c"]);
    assert_eq!(cache.offset(), 0);
    assert_eq!(cache.fetched_at(), before);
    let err = cache.last_error().unwrap();
    assert_eq!(err.kind, ErrorKind::Server);

    // Error is retry-eligible: the same page can be requested again.
    let retry = cache.load_more().unwrap();
    assert_eq!(retry.offset, 3);
    cache.complete(&retry, Ok(page(&["d"], false)));
    assert_eq!(ids(&cache), ["a", "b", "c", "d"]);
    assert!(cache.last_error().is_none());
}

#[test]
fn failed_refresh_retains_previous_entries() {
    let mut cache = initialized(SourceKey::Global, page(&["a", "b"], true));
    let req = cache.refresh().unwrap();
    cache.complete(&req, Err(FetchError::Status { status: 503 }));

    assert_eq!(cache.status(), CacheStatus::Error);
    assert_eq!(ids(&cache), ["a", "b"]);
    assert!(cache.refresh().is_some());
}

#[test]
fn source_switch_discards_all_state() {
    let mut cache = initialized(SourceKey::Global, page(&["a", "b"], true));
    let req = cache.initialize(SourceKey::School, 3).unwrap();
    // Cleared before the merge, not after.
    assert!(cache.entries().is_empty());
    assert_eq!(cache.status(), CacheStatus::LoadingInitial);

    cache.complete(&req, Ok(page(&["s1", "s2"], false)));
    assert_eq!(ids(&cache), ["s1", "s2"]);
    assert_eq!(cache.source(), Some(SourceKey::School));
}

#[test]
fn stale_response_from_superseded_source_is_discarded() {
    let mut cache = PagedCache::new();
    let req_a = cache.initialize(SourceKey::Global, 3).unwrap();
    let req_b = cache.initialize(SourceKey::Professional, 3).unwrap();

    // B resolves first, then A's late response arrives.
    cache.complete(&req_b, Ok(page(&["p1"], false)));
    cache.complete(&req_a, Ok(page(&["g1", "g2"], true)));

    assert_eq!(ids(&cache), ["p1"]);
    assert_eq!(cache.source(), Some(SourceKey::Professional));
    assert!(!cache.has_more());
}

#[test]
fn duplicate_completion_is_ignored() {
    let mut cache = PagedCache::new();
    let req = cache.initialize(SourceKey::Global, 3).unwrap();
    cache.complete(&req, Ok(page(&["a"], true)));
    cache.complete(&req, Ok(page(&["zzz"], false)));
    assert_eq!(ids(&cache), ["a"]);
    assert!(cache.has_more());
}

#[test]
fn empty_first_page_is_a_terminal_state_not_an_error() {
    let mut cache = PagedCache::new();
    let req = cache.initialize(SourceKey::School, 3).unwrap();
    cache.complete(&req, Ok(page(&[], false)));

    assert_eq!(cache.status(), CacheStatus::Idle);
    assert!(cache.entries().is_empty());
    assert!(cache.last_error().is_none());
    assert!(cache.load_more().is_none());
}

#[test]
fn top_n_pads_missing_ranks_with_none() {
    let cache = initialized(SourceKey::Global, page(&["a"], false));
    let podium = cache.top_n(3);
    assert_eq!(podium.len(), 3);
    assert_eq!(podium[0].map(|e| e.id.as_str()), Some("a"));
    assert!(podium[1].is_none());
    assert!(podium[2].is_none());

    let empty = PagedCache::new();
    assert_eq!(empty.top_n(3), vec![None, None, None]);
}

#[test]
fn snapshot_is_isolated_from_later_mutation() {
    let mut cache = initialized(SourceKey::Global, page(&["a"], true));
    let snapshot = cache.snapshot();

    let req = cache.load_more().unwrap();
    cache.complete(&req, Ok(page(&["b"], false)));

    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.status, CacheStatus::Idle);
    assert!(snapshot.has_more);
}

#[test]
fn meta_is_passed_through_and_replaced_per_page() {
    let mut cache = PagedCache::new();
    let req = cache.initialize(SourceKey::School, 3).unwrap();
    let mut first = page(&["a"], true);
    first.meta = Some(serde_json::json!({"schoolName": "Jules Ferry", "currentUserRank": 12}));
    cache.complete(&req, Ok(first));
    assert_eq!(
        cache.meta().and_then(|m| m.get("schoolName")).and_then(|v| v.as_str()),
        Some("Jules Ferry")
    );

    let req = cache.load_more().unwrap();
    let mut second = page(&["b"], false);
    second.meta = Some(serde_json::json!({"currentUserRank": 11}));
    cache.complete(&req, Ok(second));
    assert_eq!(
        cache.meta().and_then(|m| m.get("currentUserRank")).and_then(|v| v.as_u64()),
        Some(11)
    );
}
