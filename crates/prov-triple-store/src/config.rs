use serde::{Deserialize, Serialize};

/// Default SPARQL endpoint of a local Blazegraph instance.
pub const DEFAULT_SPARQL_ENDPOINT: &str = "http://localhost:9999/blazegraph/sparql";

/// Backend type for the triple store
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripleStoreBackendType {
    /// Remote SPARQL 1.1 endpoint reached over HTTP (Blazegraph, Fuseki, GraphDB, ...)
    Sparql,
    /// Embedded in-memory Oxigraph store (no external service needed)
    Oxigraph,
}

/// Configuration for the Triple Store Manager
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TripleStoreManagerConfig {
    /// Backend type to use.
    pub backend: TripleStoreBackendType,

    /// Full SPARQL endpoint URL (e.g., "http://localhost:9999/blazegraph/sparql").
    /// Ignored for Oxigraph.
    pub endpoint: String,

    /// Optional username for HTTP basic authentication
    pub username: Option<String>,

    /// Optional password for HTTP basic authentication
    pub password: Option<String>,

    /// Timeout configuration for different operation types
    pub timeouts: TimeoutConfig,

    /// Maximum concurrent operations.
    /// Limits how many triple store operations can run simultaneously.
    pub max_concurrent_operations: usize,

    /// Number of quads sent per `INSERT DATA` request when uploading a dataset.
    pub upload_batch_size: usize,
}

/// Timeout configuration for different SPARQL operations
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Timeout for SELECT queries in milliseconds
    pub query_ms: u64,

    /// Timeout for INSERT/UPDATE operations in milliseconds
    pub update_ms: u64,
}

impl TimeoutConfig {
    /// Get query timeout as Duration
    pub fn query_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.query_ms)
    }

    /// Get update timeout as Duration
    pub fn update_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.update_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            query_ms: 60_000,
            update_ms: 300_000,
        }
    }
}

impl TripleStoreManagerConfig {
    /// Configuration for a remote SPARQL endpoint with default limits.
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            backend: TripleStoreBackendType::Sparql,
            endpoint: endpoint.into(),
            username: None,
            password: None,
            timeouts: TimeoutConfig::default(),
            max_concurrent_operations: 16,
            upload_batch_size: 1_000,
        }
    }

    /// Configuration for the embedded in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: TripleStoreBackendType::Oxigraph,
            ..Self::for_endpoint(String::new())
        }
    }
}

impl Default for TripleStoreManagerConfig {
    fn default() -> Self {
        Self::for_endpoint(DEFAULT_SPARQL_ENDPOINT)
    }
}
