use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::{
    cache::ResponseCache,
    config::{HttpClientConfig, RetryPolicy},
    error::FetchError,
    error_log::ErrorLog,
};

/// JSON fetcher that retries transient failures and serves repeated URLs
/// from a persistent cache.
///
/// Only 200 responses are cached.
pub struct CachedHttpClient {
    client: Client,
    cache: ResponseCache,
    policy: RetryPolicy,
}

impl CachedHttpClient {
    /// Open the cache at `config.cache_path` and build the HTTP client.
    pub async fn connect(config: &HttpClientConfig) -> Result<Self, FetchError> {
        let cache = ResponseCache::open(&config.cache_path).await?;
        Self::new(cache, config.retry_policy())
    }

    pub fn new(cache: ResponseCache, policy: RetryPolicy) -> Result<Self, FetchError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(policy.timeout)
            .timeout(policy.timeout)
            .build()?;

        Ok(Self::with_client(client, cache, policy))
    }

    /// Use an already configured `reqwest` client.
    pub fn with_client(client: Client, cache: ResponseCache, policy: RetryPolicy) -> Self {
        Self {
            client,
            cache,
            policy,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// A cached body is returned without touching the network.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        if let Some(body) = self.cache.get(url).await? {
            tracing::debug!(url = %url, "Serving response from cache");
            return Ok(body);
        }

        let response = self.get_with_retry(url).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        self.cache.store(url, &body).await?;

        tracing::debug!(url = %url, bytes = bytes.len(), "Fetched and cached response");
        Ok(body)
    }

    /// Like [`Self::fetch_json`], but failures are recorded in `error_log`
    /// instead of returned.
    ///
    /// A non-200 status is logged as its code; any other failure as its
    /// message.
    pub async fn handle_request(&self, url: &str, error_log: &mut ErrorLog) -> Option<Value> {
        match self.fetch_json(url).await {
            Ok(body) => Some(body),
            Err(FetchError::Status(status)) => {
                tracing::warn!(url = %url, status = status, "Request returned non-200 status");
                error_log.record_status(url, status);
                None
            }
            Err(error) => {
                tracing::warn!(url = %url, error = %error, "Request failed");
                error_log.record_message(url, error.to_string());
                None
            }
        }
    }

    async fn get_with_retry(&self, url: &str) -> Result<Response, FetchError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self
                .client
                .get(url)
                .timeout(self.policy.timeout)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !self.policy.retries_status(status) {
                        return Ok(response);
                    }
                    if attempt >= max_attempts {
                        return Err(FetchError::RetriesExhausted {
                            status,
                            attempts: attempt,
                        });
                    }
                    tracing::warn!(
                        url = %url,
                        status = status,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        "Retryable status, retrying"
                    );
                }
                Err(error)
                    if attempt < max_attempts && (error.is_connect() || error.is_timeout()) =>
                {
                    tracing::warn!(
                        url = %url,
                        error = %error,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        "Request failed, retrying"
                    );
                }
                Err(error) => return Err(error.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Router, extract::State, http::StatusCode as AxumStatus, routing::get};
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::error_log::ErrorLogEntry;

    #[derive(Default)]
    struct Hits {
        ok: AtomicUsize,
        flaky: AtomicUsize,
        missing: AtomicUsize,
    }

    async fn ok(State(hits): State<Arc<Hits>>) -> (AxumStatus, &'static str) {
        hits.ok.fetch_add(1, Ordering::SeqCst);
        (AxumStatus::OK, r#"{"id": 1, "title": "A paper"}"#)
    }

    async fn flaky(State(hits): State<Arc<Hits>>) -> AxumStatus {
        hits.flaky.fetch_add(1, Ordering::SeqCst);
        AxumStatus::BAD_GATEWAY
    }

    async fn missing(State(hits): State<Arc<Hits>>) -> AxumStatus {
        hits.missing.fetch_add(1, Ordering::SeqCst);
        AxumStatus::NOT_FOUND
    }

    async fn not_json() -> (AxumStatus, &'static str) {
        (AxumStatus::OK, "<html>maintenance</html>")
    }

    async fn spawn_api() -> (String, Arc<Hits>) {
        let hits = Arc::new(Hits::default());
        let app = Router::new()
            .route("/ok", get(ok))
            .route("/flaky", get(flaky))
            .route("/missing", get(missing))
            .route("/not-json", get(not_json))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), hits)
    }

    async fn client(temp_dir: &TempDir, tries: u32) -> CachedHttpClient {
        let config = HttpClientConfig {
            cache_path: temp_dir.path().join("cache.redb"),
            tries,
            timeout_secs: 5,
            ..HttpClientConfig::default()
        };
        CachedHttpClient::connect(&config).await.unwrap()
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let (base, hits) = spawn_api().await;
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir, 1).await;
        let url = format!("{base}/ok");

        let first = client.fetch_json(&url).await.unwrap();
        let second = client.fetch_json(&url).await.unwrap();

        assert_eq!(first, json!({"id": 1, "title": "A paper"}));
        assert_eq!(first, second);
        assert_eq!(hits.ok.load(Ordering::SeqCst), 1);
        assert_eq!(client.cache().len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn forcelisted_status_is_retried() {
        let (base, hits) = spawn_api().await;
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir, 2).await;

        let error = client
            .fetch_json(&format!("{base}/flaky"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            FetchError::RetriesExhausted {
                status: 502,
                attempts: 3
            }
        ));
        assert_eq!(hits.flaky.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn not_found_is_not_retried_or_cached() {
        let (base, hits) = spawn_api().await;
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir, 1).await;
        let url = format!("{base}/missing");

        let error = client.fetch_json(&url).await.unwrap_err();
        assert!(matches!(error, FetchError::Status(404)));
        client.fetch_json(&url).await.unwrap_err();

        assert_eq!(hits.missing.load(Ordering::SeqCst), 2);
        assert_eq!(client.cache().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let (base, _hits) = spawn_api().await;
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir, 1).await;

        let error = client
            .fetch_json(&format!("{base}/not-json"))
            .await
            .unwrap_err();

        assert!(matches!(error, FetchError::Json(_)));
    }

    #[tokio::test]
    async fn handle_request_logs_status_codes() {
        let (base, _hits) = spawn_api().await;
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir, 1).await;
        let mut error_log = ErrorLog::new();
        let url = format!("{base}/missing");

        assert!(client.handle_request(&url, &mut error_log).await.is_none());
        assert_eq!(error_log.get(&url), Some(&ErrorLogEntry::Status(404)));

        let ok_url = format!("{base}/ok");
        assert!(client.handle_request(&ok_url, &mut error_log).await.is_some());
        assert_eq!(error_log.len(), 1);
    }

    #[tokio::test]
    async fn handle_request_logs_transport_failures() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir, 1).await;
        let mut error_log = ErrorLog::new();
        let url = format!("http://{addr}/gone");

        assert!(client.handle_request(&url, &mut error_log).await.is_none());
        assert!(matches!(
            error_log.get(&url),
            Some(ErrorLogEntry::Message(message)) if !message.is_empty()
        ));
    }
}
