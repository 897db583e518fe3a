use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single page fetch. Transport and server failures are
/// distinguished here at the dispatcher boundary; the cache collapses both
/// into the same error state.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {status}")]
    Status { status: u16 },
    #[error("malformed page body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure constructing an [`HttpFetcher`](crate::http::HttpFetcher).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Transport,
    Server,
    Decode,
}

/// Cheap, cloneable error descriptor kept in cache state so consumers can
/// render an inline retry affordance without unwinding a call stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub detail: String,
}

impl From<&FetchError> for ErrorInfo {
    fn from(err: &FetchError) -> Self {
        let kind = match err {
            FetchError::Transport(_) => ErrorKind::Transport,
            FetchError::Status { .. } => ErrorKind::Server,
            FetchError::Decode(_) => ErrorKind::Decode,
        };
        Self {
            kind,
            detail: err.to_string(),
        }
    }
}
