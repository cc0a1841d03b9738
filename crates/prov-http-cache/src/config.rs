use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Statuses retried by default: transient gateway and origin failures.
pub const DEFAULT_STATUS_FORCELIST: [u16; 6] = [500, 502, 504, 520, 521, 522];

/// Configuration for the cached HTTP client
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct HttpClientConfig {
    /// Path of the redb response cache; parent directories are created.
    pub cache_path: PathBuf,

    /// Number of retries after the first attempt.
    pub tries: u32,

    /// Response statuses that trigger a retry.
    pub status_forcelist: Vec<u16>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpClientConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            tries: self.tries,
            status_forcelist: self.status_forcelist.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            cache_path: PathBuf::from("cache/http_cache.redb"),
            tries: policy.tries,
            status_forcelist: policy.status_forcelist,
            timeout_secs: policy.timeout.as_secs(),
        }
    }
}

/// Retry behaviour of [`crate::CachedHttpClient`].
///
/// A request is sent at most `tries + 1` times. Connection errors, timeouts
/// and statuses listed in `status_forcelist` consume one retry each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub tries: u32,
    pub status_forcelist: Vec<u16>,
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.tries.saturating_add(1)
    }

    pub fn retries_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            tries: 1,
            status_forcelist: DEFAULT_STATUS_FORCELIST.to_vec(),
            timeout: Duration::from_secs(60),
        }
    }
}
