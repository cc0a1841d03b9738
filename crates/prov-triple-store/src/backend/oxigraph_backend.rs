use std::time::Duration;

use async_trait::async_trait;
use oxigraph::{
    sparql::{
        QueryResults, SparqlEvaluator,
        results::{QueryResultsFormat, QueryResultsSerializer},
    },
    store::Store,
};

use super::TripleStoreBackend;
use crate::error::{Result, TripleStoreError};

/// Oxigraph embedded triple store backend
///
/// Keeps everything in memory. Used for offline work and as a stand-in for a
/// remote endpoint in tests: SELECT results go through the same JSON
/// serialization a SPARQL server would produce.
pub struct OxigraphBackend {
    store: Store,
}

impl OxigraphBackend {
    /// Create a new in-memory Oxigraph backend
    pub fn in_memory() -> Result<Self> {
        let store = Store::new().map_err(|e| {
            TripleStoreError::Other(format!("Failed to create in-memory Oxigraph store: {}", e))
        })?;

        tracing::debug!("Created in-memory Oxigraph store");

        Ok(Self { store })
    }
}

#[async_trait]
impl TripleStoreBackend for OxigraphBackend {
    fn name(&self) -> &'static str {
        "oxigraph"
    }

    async fn health_check(&self) -> Result<bool> {
        let result = SparqlEvaluator::new()
            .parse_query("ASK { ?s ?p ?o }")
            .map_err(|e| {
                TripleStoreError::Other(format!("Health check query parse failed: {}", e))
            })?
            .on_store(&self.store)
            .execute()
            .map_err(|e| TripleStoreError::Other(format!("Health check query failed: {}", e)))?;

        Ok(matches!(result, QueryResults::Boolean(_)))
    }

    async fn update(&self, query: &str, _timeout: Duration) -> Result<()> {
        let prepared = SparqlEvaluator::new().parse_update(query).map_err(|e| {
            TripleStoreError::InvalidQuery {
                reason: format!("Failed to parse SPARQL UPDATE: {}", e),
            }
        })?;

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            prepared
                .on_store(&store)
                .execute()
                .map_err(|e| TripleStoreError::Other(format!("SPARQL UPDATE failed: {}", e)))
        })
        .await
        .map_err(|e| TripleStoreError::Other(format!("Task join error: {}", e)))??;

        Ok(())
    }

    async fn select(&self, query: &str, _timeout: Duration) -> Result<String> {
        let mut prepared = SparqlEvaluator::new().parse_query(query).map_err(|e| {
            TripleStoreError::InvalidQuery {
                reason: format!("Failed to parse SPARQL SELECT: {}", e),
            }
        })?;
        // Match quad stores like Blazegraph: the default graph spans every named graph
        prepared.dataset_mut().set_default_graph_as_union();

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            let result = prepared
                .on_store(&store)
                .execute()
                .map_err(|e| TripleStoreError::Other(format!("SPARQL SELECT failed: {}", e)))?;

            let QueryResults::Solutions(solutions) = result else {
                return Err(TripleStoreError::Other(
                    "Expected SELECT to return solutions".to_string(),
                ));
            };

            let mut serializer = QueryResultsSerializer::from_format(QueryResultsFormat::Json)
                .serialize_solutions_to_writer(Vec::new(), solutions.variables().to_vec())
                .map_err(serialization_error)?;
            for solution in solutions {
                let solution = solution.map_err(|e| {
                    TripleStoreError::Other(format!("SPARQL SELECT failed: {}", e))
                })?;
                serializer
                    .serialize(&solution)
                    .map_err(serialization_error)?;
            }
            let body = serializer.finish().map_err(serialization_error)?;

            String::from_utf8(body).map_err(|e| TripleStoreError::ParseError {
                reason: format!("SELECT results are not valid UTF-8: {}", e),
            })
        })
        .await
        .map_err(|e| TripleStoreError::Other(format!("Task join error: {}", e)))?
    }
}

fn serialization_error(error: std::io::Error) -> TripleStoreError {
    TripleStoreError::Serialization {
        reason: format!("Failed to write SELECT results: {}", error),
    }
}
