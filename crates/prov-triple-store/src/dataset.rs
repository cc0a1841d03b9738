use std::{collections::BTreeMap, path::Path, time::Instant};

use oxigraph::model::{Dataset, GraphNameRef, QuadRef};

use crate::{
    TripleStoreManager,
    error::{Result, TripleStoreError},
    rdf,
};

/// Build one `INSERT DATA` update for a batch of quads.
///
/// Triples are grouped by named graph; default-graph triples are written
/// outside any `GRAPH` block. Blank-node graph names cannot be expressed in
/// `INSERT DATA` and are rejected.
pub(crate) fn build_insert_data(quads: &[QuadRef<'_>]) -> Result<String> {
    let mut default_graph: Vec<String> = Vec::new();
    let mut named_graphs: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for quad in quads {
        let triple = format!("{} {} {} .", quad.subject, quad.predicate, quad.object);
        match quad.graph_name {
            GraphNameRef::DefaultGraph => default_graph.push(triple),
            GraphNameRef::NamedNode(graph) => named_graphs
                .entry(graph.as_str().to_string())
                .or_default()
                .push(triple),
            GraphNameRef::BlankNode(graph) => {
                return Err(TripleStoreError::InvalidQuery {
                    reason: format!("Blank node graph name {graph} cannot be uploaded"),
                });
            }
        }
    }

    let mut query = String::from("INSERT DATA {\n");
    for triple in &default_graph {
        query.push_str(&format!("  {}\n", triple));
    }
    for (graph, triples) in &named_graphs {
        query.push_str(&format!("  GRAPH <{}> {{\n", graph));
        for triple in triples {
            query.push_str(&format!("    {}\n", triple));
        }
        query.push_str("  }\n");
    }
    query.push('}');

    Ok(query)
}

impl TripleStoreManager {
    /// Upload every quad of `dataset` with batched `INSERT DATA` updates.
    ///
    /// Batches hold at most `upload_batch_size` quads. Blank nodes are scoped
    /// to a single update, so a blank node shared by quads of different
    /// batches is stored as distinct nodes.
    ///
    /// Returns the number of quads uploaded.
    pub async fn upload_dataset(&self, dataset: &Dataset) -> Result<usize> {
        let started = Instant::now();
        let batch_size = self.config.upload_batch_size.max(1);
        let quads: Vec<QuadRef<'_>> = dataset.iter().collect();

        for (index, batch) in quads.chunks(batch_size).enumerate() {
            let query = build_insert_data(batch)?;
            self.backend_update(&query, self.config.timeouts.update_timeout())
                .await?;
            tracing::debug!(
                batch = index,
                quads = batch.len(),
                "Uploaded dataset batch"
            );
        }

        tracing::info!(
            backend = %self.backend.name(),
            quads = quads.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Uploaded dataset to triple store"
        );

        Ok(quads.len())
    }

    /// Store `dataset` in `path`, then upload it.
    pub async fn upload_and_store_dataset(&self, dataset: &Dataset, path: &Path) -> Result<usize> {
        rdf::dump_dataset(dataset, path).await?;
        self.upload_dataset(dataset).await
    }
}
