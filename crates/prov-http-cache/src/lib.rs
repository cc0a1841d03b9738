mod cache;
mod client;
mod config;
mod error;
mod error_log;

pub use cache::ResponseCache;
pub use client::CachedHttpClient;
pub use config::{HttpClientConfig, RetryPolicy};
pub use error::{CacheError, FetchError};
pub use error_log::{ErrorLog, ErrorLogEntry};
