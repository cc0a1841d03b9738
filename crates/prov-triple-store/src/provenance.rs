//! Provenance download from a triplestore.
//!
//! Every statement about a `prov:Entity` subject is fetched as a flat
//! `?s ?p ?o ?g` SELECT result and rebuilt into quads.

use std::{collections::HashMap, path::Path, time::Instant};

use oxigraph::model::{BlankNode, Dataset, GraphName, NamedOrBlankNode, Quad, Term};

use crate::{
    TripleStoreManager, TripleStoreManagerConfig,
    error::{Result, TripleStoreError},
    query::classes,
    rdf,
    sparql::{SelectResult, SelectRow, SelectValue},
};

/// SELECT query returning every quad whose subject is a provenance entity.
pub fn provenance_query() -> String {
    format!(
        r#"SELECT DISTINCT ?s ?p ?o ?g
WHERE {{
    GRAPH ?g {{ ?s ?p ?o }}
    ?s a <{}>
}}"#,
        classes::PROV_ENTITY
    )
}

/// Rebuild a SELECT result with exactly four projected variables into quads.
///
/// Positions are taken from the order of `head.vars`: the first variable is
/// the subject, then predicate, object and graph name. Blank-node labels are
/// scoped to the result, so each distinct label becomes one fresh blank node
/// shared by every row that mentions it.
pub fn quads_from_select(result: &SelectResult) -> Result<Dataset> {
    let [subject_var, predicate_var, object_var, graph_var] = result.variables.as_slice() else {
        return Err(TripleStoreError::ParseError {
            reason: format!(
                "Expected 4 result variables to build quads, got {}",
                result.variables.len()
            ),
        });
    };

    let mut blank_nodes = BlankNodeScope::default();
    let mut dataset = Dataset::new();
    for row in &result.rows {
        let subject = match blank_nodes.term(row, subject_var)? {
            Term::NamedNode(node) => NamedOrBlankNode::from(node),
            Term::BlankNode(node) => NamedOrBlankNode::from(node),
            other => return Err(misplaced("subject", &other)),
        };
        let predicate = match blank_nodes.term(row, predicate_var)? {
            Term::NamedNode(node) => node,
            other => return Err(misplaced("predicate", &other)),
        };
        let object = blank_nodes.term(row, object_var)?;
        let graph_name = match blank_nodes.term(row, graph_var)? {
            Term::NamedNode(node) => GraphName::from(node),
            Term::BlankNode(node) => GraphName::from(node),
            other => return Err(misplaced("graph name", &other)),
        };

        dataset.insert(&Quad::new(subject, predicate, object, graph_name));
    }

    Ok(dataset)
}

/// Blank nodes minted for the labels of one SELECT result.
#[derive(Default)]
struct BlankNodeScope {
    nodes: HashMap<String, BlankNode>,
}

impl BlankNodeScope {
    fn term(&mut self, row: &SelectRow, var: &str) -> Result<Term> {
        let value = row.get(var).ok_or_else(|| TripleStoreError::ParseError {
            reason: format!("Result row has no binding for ?{var}"),
        })?;

        match value {
            // Endpoint labels such as Virtuoso's `nodeID://b1` are not valid
            // N-Triples labels
            SelectValue::BlankNode(label) => {
                Ok(self.nodes.entry(label.clone()).or_default().clone().into())
            }
            other => other.to_term(),
        }
    }
}

fn misplaced(position: &str, term: &Term) -> TripleStoreError {
    TripleStoreError::ParseError {
        reason: format!("{term} cannot be used as a {position}"),
    }
}

impl TripleStoreManager {
    /// Download all provenance quads from the configured endpoint.
    ///
    /// The request is sent once; transport failures, non-success statuses and
    /// malformed bodies are returned to the caller as-is.
    pub async fn fetch_provenance(&self) -> Result<Dataset> {
        let started = Instant::now();
        let body = self
            .backend_select(&provenance_query(), self.config.timeouts.query_timeout())
            .await?;
        let result = crate::sparql::parse_select_results(&body)?;
        let dataset = quads_from_select(&result)?;

        tracing::info!(
            backend = %self.backend.name(),
            rows = result.rows.len(),
            quads = dataset.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched provenance from triple store"
        );

        Ok(dataset)
    }

    /// Download provenance and write it to `path` as JSON-LD.
    ///
    /// Returns the number of quads written.
    pub async fn fetch_and_store_provenance(&self, path: impl AsRef<Path>) -> Result<usize> {
        let dataset = self.fetch_provenance().await?;
        rdf::dump_dataset(&dataset, path.as_ref()).await?;
        Ok(dataset.len())
    }
}

/// One-shot provenance download from `endpoint_url`.
pub async fn fetch_provenance(endpoint_url: &str) -> Result<Dataset> {
    let manager = TripleStoreManager::new(&TripleStoreManagerConfig::for_endpoint(endpoint_url))?;
    manager.fetch_provenance().await
}

/// One-shot provenance download from `endpoint_url`, written to `path` as JSON-LD.
pub async fn fetch_and_store_provenance(path: impl AsRef<Path>, endpoint_url: &str) -> Result<()> {
    let manager = TripleStoreManager::new(&TripleStoreManagerConfig::for_endpoint(endpoint_url))?;
    manager.fetch_and_store_provenance(path).await?;
    Ok(())
}
