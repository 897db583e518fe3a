pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod models;
pub mod select;

pub use cache::{CacheSnapshot, CacheStatus, FetchRequest, PagedCache, DEFAULT_PAGE_SIZE};
pub use client::Leaderboard;
pub use config::ClientConfig;
pub use error::{ErrorInfo, ErrorKind, FetchError, SetupError};
pub use fetch::{PageFetcher, PageQuery};
pub use http::HttpFetcher;
pub use models::{Entry, Page};
pub use select::{active_source, Role, SourceKey, ViewMode, ViewerContext};
