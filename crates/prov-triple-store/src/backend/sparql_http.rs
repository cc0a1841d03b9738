use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};

use super::TripleStoreBackend;
use crate::{
    config::TripleStoreManagerConfig,
    error::{Result, TripleStoreError},
};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// SPARQL 1.1 protocol backend for a remote HTTP endpoint
pub struct SparqlHttpBackend {
    client: Client,
    config: TripleStoreManagerConfig,
}

impl SparqlHttpBackend {
    /// Create a new HTTP backend for `config.endpoint`
    pub fn new(config: TripleStoreManagerConfig) -> Result<Self> {
        let client = Client::builder()
            // Connection pooling: keep up to 10 idle connections per host
            .pool_max_idle_per_host(10)
            // Close idle connections after 30 seconds
            .pool_idle_timeout(Duration::from_secs(30))
            // TCP keepalive to detect dead connections
            .tcp_keepalive(Duration::from_secs(60))
            // Timeout for establishing new connections
            .connect_timeout(Duration::from_secs(10))
            // Default request timeout (overridden per-request)
            .timeout(config.timeouts.query_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    /// Build request with optional authentication
    fn auth_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        match (&self.config.username, &self.config.password) {
            (Some(user), Some(pass)) => builder.basic_auth(user, Some(pass)),
            _ => builder,
        }
    }

    fn query_request(&self, query: &str, timeout: Duration) -> RequestBuilder {
        self.auth_headers(self.client.post(&self.config.endpoint))
            .header("Content-Type", "application/sparql-query")
            .header("Accept", SPARQL_RESULTS_JSON)
            // Blazegraph server-side query deadline; other stores ignore it
            .header("X-BIGDATA-MAX-QUERY-MILLIS", timeout.as_millis().to_string())
            .timeout(timeout)
            .body(query.to_string())
    }
}

/// Turn a non-success response into a backend error carrying its body.
async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(TripleStoreError::Backend { status, message })
}

#[async_trait]
impl TripleStoreBackend for SparqlHttpBackend {
    fn name(&self) -> &'static str {
        "sparql-http"
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .query_request("ASK { ?s ?p ?o }", Duration::from_secs(10))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn update(&self, query: &str, timeout: Duration) -> Result<()> {
        let response = self
            .auth_headers(self.client.post(&self.config.endpoint))
            .header("Content-Type", "application/sparql-update")
            .header("X-BIGDATA-MAX-QUERY-MILLIS", timeout.as_millis().to_string())
            .timeout(timeout)
            .body(query.to_string())
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn select(&self, query: &str, timeout: Duration) -> Result<String> {
        let response = self.query_request(query, timeout).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.text().await?)
    }
}
