use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{FetchError, SetupError};
use crate::fetch::{PageFetcher, PageQuery};
use crate::models::{Entry, Page};
use crate::select::SourceKey;

/// Wire shape shared by all three leaderboard endpoints, except for the
/// score field whose name differs per source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePage {
    #[serde(default)]
    items: Vec<WireEntry>,
    pagination: WirePagination,
    #[serde(default)]
    meta: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePagination {
    has_more: bool,
    #[serde(default)]
    next_offset: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    id: String,
    name: String,
    #[serde(default)]
    rank: Option<u32>,
    #[serde(default)]
    points: Option<f64>,
    #[serde(default)]
    total_points: Option<f64>,
    #[serde(default)]
    questions_count: Option<f64>,
    #[serde(default)]
    finished: Option<bool>,
}

impl WireEntry {
    /// Unifies the per-source score field into one display value. Each
    /// source's canonical field is read first, the others serve as fallback
    /// for servers that already normalized.
    fn score(&self, source: SourceKey) -> f64 {
        let canonical = match source {
            SourceKey::Professional => self.points,
            SourceKey::School => self.total_points,
            SourceKey::Global => self.questions_count,
        };
        canonical
            .or(self.points)
            .or(self.total_points)
            .or(self.questions_count)
            .unwrap_or(0.0)
    }
}

/// Reqwest-backed [`PageFetcher`] with one endpoint per source, request
/// timeout and bounded retry with linear backoff on transport errors.
/// Server responses (any status) are never retried.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    professional: Url,
    school: Url,
    global: Url,
    max_retries: u8,
    retry_backoff_ms: u64,
}

impl HttpFetcher {
    pub fn new(base_url: Url, config: &ClientConfig) -> Result<Self, SetupError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            professional: base_url.join("leaderboard/professional")?,
            school: base_url.join("leaderboard/school")?,
            global: base_url.join("leaderboard/global")?,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    fn endpoint(&self, source: SourceKey) -> &Url {
        match source {
            SourceKey::Professional => &self.professional,
            SourceKey::School => &self.school,
            SourceKey::Global => &self.global,
        }
    }

    async fn fetch_once(&self, source: SourceKey, query: &PageQuery) -> Result<Page, FetchError> {
        let mut request = self.client.get(self.endpoint(source).clone()).query(&[
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ]);
        if let Some(sort_by) = &query.sort_by {
            request = request.query(&[("sortBy", sort_by)]);
        }
        if let Some(class_level) = &query.class_level {
            request = request.query(&[("classLevel", class_level)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        let wire: WirePage = serde_json::from_slice(&bytes)?;
        debug!(?source, offset = query.offset, items = wire.items.len(), "fetched page");

        let entries = wire
            .items
            .into_iter()
            .map(|item| Entry {
                score: item.score(source),
                id: item.id,
                name: item.name,
                rank: item.rank,
                finished: item.finished,
            })
            .collect();
        Ok(Page {
            entries,
            has_more: wire.pagination.has_more,
            next_offset: wire.pagination.next_offset,
            meta: wire.meta,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, source: SourceKey, query: &PageQuery) -> Result<Page, FetchError> {
        let mut attempt: u8 = 0;
        loop {
            match self.fetch_once(source, query).await {
                Ok(page) => return Ok(page),
                Err(FetchError::Transport(err)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(?source, attempt, error = %err, "transport error, retrying");
                    tokio::time::sleep(Duration::from_millis(
                        self.retry_backoff_ms * u64::from(attempt),
                    ))
                    .await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
