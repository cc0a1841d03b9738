//! RDF dataset file I/O.
//!
//! Datasets are written as JSON-LD unless the file extension names another
//! RDF syntax. Literals keep their lexical form in both directions, so
//! partial dates such as `xsd:gYear` round-trip unchanged.

use std::path::Path;

use oxigraph::{
    io::{JsonLdProfileSet, RdfFormat, RdfParser, RdfSerializer},
    model::Dataset,
};

use crate::error::{Result, TripleStoreError};

/// JSON-LD without any profile, the default output format.
pub fn json_ld() -> RdfFormat {
    RdfFormat::JsonLd {
        profile: JsonLdProfileSet::empty(),
    }
}

/// Resolve the RDF syntax of a file from its extension.
///
/// `.json` is read as JSON-LD.
pub fn format_for_path(path: &Path) -> Option<RdfFormat> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "json" | "jsonld" => Some(json_ld()),
        other => RdfFormat::from_extension(other),
    }
}

/// Serialize `dataset` in the given syntax.
pub fn serialize_dataset(dataset: &Dataset, format: RdfFormat) -> Result<Vec<u8>> {
    let format_name = format.name();
    let mut serializer = RdfSerializer::from_format(format).for_writer(Vec::new());
    for quad in dataset.iter() {
        serializer
            .serialize_quad(quad)
            .map_err(|e| TripleStoreError::Serialization {
                reason: format!("Failed to serialize quad: {e}"),
            })?;
    }
    serializer
        .finish()
        .map_err(|e| TripleStoreError::Serialization {
            reason: format!("Failed to finish {format_name} serialization: {e}"),
        })
}

/// Parse a dataset from bytes in the given syntax.
pub fn parse_dataset(data: &[u8], format: RdfFormat, base_iri: Option<&str>) -> Result<Dataset> {
    let format_name = format.name();
    let mut parser = RdfParser::from_format(format);
    if let Some(base_iri) = base_iri {
        parser = parser
            .with_base_iri(base_iri)
            .map_err(|e| TripleStoreError::ParseError {
                reason: format!("Invalid base IRI <{base_iri}>: {e}"),
            })?;
    }

    let mut dataset = Dataset::new();
    for quad in parser.for_reader(data) {
        let quad = quad.map_err(|e| TripleStoreError::ParseError {
            reason: format!("Failed to parse {format_name} document: {e}"),
        })?;
        dataset.insert(&quad);
    }
    Ok(dataset)
}

/// Write `dataset` to `path`, creating or overwriting the file.
pub async fn dump_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    let format = format_for_path(path).unwrap_or_else(json_ld);
    let format_name = format.name();
    let quads = dataset.len();
    let dataset = dataset.clone();
    let bytes = tokio::task::spawn_blocking(move || serialize_dataset(&dataset, format))
        .await
        .map_err(|e| TripleStoreError::Other(format!("Task join error: {}", e)))??;
    tokio::fs::write(path, bytes).await?;

    tracing::info!(
        path = %path.display(),
        format = %format_name,
        quads = quads,
        "Stored dataset in file"
    );
    Ok(())
}

/// Load a dataset from `path`, picking the syntax from the file extension.
pub async fn load_dataset(path: &Path, base_iri: Option<&str>) -> Result<Dataset> {
    let format = format_for_path(path).ok_or_else(|| TripleStoreError::InvalidFormat {
        reason: format!("Cannot guess RDF syntax of {}", path.display()),
    })?;

    tracing::info!(path = %path.display(), format = %format.name(), "Importing dataset from file");

    let data = tokio::fs::read(path).await?;
    let base_iri = base_iri.map(str::to_string);
    tokio::task::spawn_blocking(move || parse_dataset(&data, format, base_iri.as_deref()))
        .await
        .map_err(|e| TripleStoreError::Other(format!("Task join error: {}", e)))?
}
