use serde::{Deserialize, Serialize};

/// One leaderboard row as exposed to consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: String,
    pub name: String,
    /// Server-assigned rank (>= 1). Trusted as sent and never recomputed by
    /// the cache. When absent, consumers derive the displayed rank from the
    /// entry's position in the merged list (`index + 1`); deriving it from
    /// anything else silently produces wrong ranks after a partial merge.
    pub rank: Option<u32>,
    /// Normalized display value. The wire field name varies by source
    /// (points, totalPoints, questionsCount) and is unified by the fetcher.
    pub score: f64,
    /// Entry may still be updating server-side; consumers show a per-row
    /// spinner while this is `Some(false)`.
    pub finished: Option<bool>,
}

/// One fetched page of a leaderboard, already normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub entries: Vec<Entry>,
    pub has_more: bool,
    pub next_offset: u64,
    /// Opaque source-specific metadata (current-user rank, school name, ...)
    /// passed through unmodified.
    pub meta: Option<serde_json::Value>,
}
