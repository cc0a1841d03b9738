mod backend;
mod config;
mod dataset;
pub mod error;
pub mod provenance;
pub mod query;
pub mod rdf;
pub mod sparql;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use backend::{OxigraphBackend, SparqlHttpBackend, TripleStoreBackend};
pub use config::{
    DEFAULT_SPARQL_ENDPOINT, TimeoutConfig, TripleStoreBackendType, TripleStoreManagerConfig,
};
use error::{Result, TripleStoreError};
pub use oxigraph::model::Dataset;
pub use provenance::{fetch_and_store_provenance, fetch_provenance};
pub use rdf::{dump_dataset, load_dataset};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[cfg(test)]
mod tests;

/// Triple Store Manager
///
/// Provides high-level operations against a SPARQL triple store:
/// provenance download and dataset upload.
pub struct TripleStoreManager {
    pub(crate) backend: Box<dyn TripleStoreBackend>,
    pub(crate) config: TripleStoreManagerConfig,
    /// Semaphore for limiting concurrent operations
    concurrency_limiter: Arc<Semaphore>,
}

impl TripleStoreManager {
    /// Create a new Triple Store Manager
    ///
    /// Creates the appropriate backend based on configuration. No request is
    /// sent; use [`TripleStoreManager::health_check`] to check the endpoint.
    pub fn new(config: &TripleStoreManagerConfig) -> Result<Self> {
        let backend: Box<dyn TripleStoreBackend> = match config.backend {
            TripleStoreBackendType::Sparql => Box::new(SparqlHttpBackend::new(config.clone())?),
            TripleStoreBackendType::Oxigraph => Box::new(OxigraphBackend::in_memory()?),
        };

        Ok(Self::from_backend(backend, config.clone()))
    }

    /// Create a manager around an already constructed backend.
    pub fn from_backend(
        backend: Box<dyn TripleStoreBackend>,
        config: TripleStoreManagerConfig,
    ) -> Self {
        let max_concurrent = config.max_concurrent_operations.max(1);
        if max_concurrent != config.max_concurrent_operations {
            tracing::warn!(
                configured = config.max_concurrent_operations,
                effective = max_concurrent,
                "Triple store max_concurrent_operations too low; clamped"
            );
        }
        tracing::debug!(
            backend = %backend.name(),
            max_concurrent = max_concurrent,
            "Triple store concurrency limiter initialized"
        );

        Self {
            backend,
            config,
            concurrency_limiter: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Effective concurrency limit used by the internal semaphore.
    pub fn max_concurrent_operations(&self) -> usize {
        self.config.max_concurrent_operations.max(1)
    }

    /// Verify that the triple store answers queries.
    pub async fn health_check(&self) -> Result<bool> {
        let healthy = self.backend.health_check().await?;
        if healthy {
            tracing::info!(backend = %self.backend.name(), "Triple store is reachable");
        } else {
            tracing::warn!(backend = %self.backend.name(), "Triple store health check returned false");
        }
        Ok(healthy)
    }

    // ========== Internal Backend Wrappers (with concurrency limiting) ==========

    async fn acquire_permit(&self) -> Result<OwnedSemaphorePermit> {
        self.concurrency_limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| TripleStoreError::SemaphoreClosed)
    }

    /// Execute a SPARQL UPDATE with concurrency limiting
    pub(crate) async fn backend_update(&self, query: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        let permit = self.acquire_permit().await?;
        let result = self.backend.update(query, timeout).await;
        drop(permit);

        log_operation(self.backend.name(), "update", query.len(), &result, started);
        result
    }

    /// Execute a SPARQL SELECT with concurrency limiting
    pub(crate) async fn backend_select(&self, query: &str, timeout: Duration) -> Result<String> {
        let started = Instant::now();
        let permit = self.acquire_permit().await?;
        let result = self.backend.select(query, timeout).await;
        drop(permit);

        log_operation(self.backend.name(), "select", query.len(), &result, started);
        result
    }
}

fn log_operation<T>(
    backend: &str,
    op: &str,
    query_bytes: usize,
    result: &Result<T>,
    started: Instant,
) {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(_) => tracing::debug!(
            backend = %backend,
            op = %op,
            query_bytes = query_bytes,
            elapsed_ms = elapsed_ms,
            "Triple store operation completed"
        ),
        Err(error) => tracing::warn!(
            backend = %backend,
            op = %op,
            query_bytes = query_bytes,
            elapsed_ms = elapsed_ms,
            error = %error,
            "Triple store operation failed"
        ),
    }
}
