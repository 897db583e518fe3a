use std::time::Duration;

/// Client-side tuning for page fetching. In-memory only; there is no
/// persisted configuration in this core.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Entries requested per page. Must be positive.
    pub page_size: u64,
    pub request_timeout: Duration,
    /// Transport-level retries per fetch. Server responses are never retried.
    pub max_retries: u8,
    pub retry_backoff_ms: u64,
    /// Forwarded as `sortBy` on every request when set.
    pub sort_by: Option<String>,
    /// Forwarded as `classLevel` on every request when set.
    pub class_level: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            request_timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_backoff_ms: 500,
            sort_by: None,
            class_level: None,
        }
    }
}
