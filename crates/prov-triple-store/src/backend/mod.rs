mod oxigraph_backend;
mod sparql_http;

use std::time::Duration;

use async_trait::async_trait;
pub use oxigraph_backend::OxigraphBackend;
pub use sparql_http::SparqlHttpBackend;

use crate::error::Result;

/// Trait for triple store backends
///
/// Implementations provide the low-level SPARQL execution against
/// specific triple store systems (Blazegraph, Fuseki, GraphDB, embedded Oxigraph, etc.)
#[async_trait]
pub trait TripleStoreBackend: Send + Sync {
    /// Backend name for logging/debugging
    fn name(&self) -> &'static str;

    /// Health check - verify the triple store is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Execute a SPARQL UPDATE query (INSERT/DELETE)
    ///
    /// Returns nothing on success
    async fn update(&self, query: &str, timeout: Duration) -> Result<()>;

    /// Execute a SPARQL SELECT query
    ///
    /// Returns SPARQL results JSON as a string
    async fn select(&self, query: &str, timeout: Duration) -> Result<String>;
}
