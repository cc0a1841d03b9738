//! SPARQL 1.1 Query Results JSON parsing.

use std::collections::HashMap;

use oxigraph::model::{BlankNode, Literal, NamedNode, Term};
use serde::Deserialize;

use crate::error::{Result, TripleStoreError};

/// Value from a SPARQL SELECT binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectValue {
    /// URI/IRI value
    Uri(String),
    /// Literal value with optional datatype and language tag
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
    /// Blank node
    BlankNode(String),
}

impl SelectValue {
    /// Get the string value regardless of type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uri(s) | Self::BlankNode(s) => s,
            Self::Literal { value, .. } => value,
        }
    }

    /// Convert the binding into an RDF term.
    ///
    /// A literal carrying a language tag becomes a language-tagged string,
    /// one carrying a datatype becomes a typed literal, anything else a
    /// plain literal.
    pub fn to_term(&self) -> Result<Term> {
        let term = match self {
            Self::Uri(iri) => NamedNode::new(iri.as_str())
                .map_err(|e| parse_error(format!("Invalid IRI <{iri}>: {e}")))?
                .into(),
            Self::BlankNode(id) => BlankNode::new(id.as_str())
                .map_err(|e| parse_error(format!("Invalid blank node id '{id}': {e}")))?
                .into(),
            Self::Literal {
                value,
                language: Some(language),
                ..
            } => Literal::new_language_tagged_literal(value.as_str(), language.as_str())
                .map_err(|e| parse_error(format!("Invalid language tag '{language}': {e}")))?
                .into(),
            Self::Literal {
                value,
                datatype: Some(datatype),
                ..
            } => {
                let datatype = NamedNode::new(datatype.as_str())
                    .map_err(|e| parse_error(format!("Invalid datatype <{datatype}>: {e}")))?;
                Literal::new_typed_literal(value.as_str(), datatype).into()
            }
            Self::Literal { value, .. } => Literal::new_simple_literal(value.as_str()).into(),
        };
        Ok(term)
    }
}

/// A row from a SPARQL SELECT query result
#[derive(Debug, Clone, Default)]
pub struct SelectRow {
    pub bindings: HashMap<String, SelectValue>,
}

impl SelectRow {
    /// Get a binding value by variable name
    pub fn get(&self, var: &str) -> Option<&SelectValue> {
        self.bindings.get(var)
    }

    /// Get a binding value as a string
    pub fn get_str(&self, var: &str) -> Option<&str> {
        self.bindings.get(var).map(SelectValue::as_str)
    }
}

/// Result from a SPARQL SELECT query
#[derive(Debug, Clone, Default)]
pub struct SelectResult {
    /// Projected variables, in the order reported by `head.vars`
    pub variables: Vec<String>,
    pub rows: Vec<SelectRow>,
}

#[derive(Deserialize)]
struct SparqlSelectResponse {
    head: SparqlSelectHead,
    results: SparqlSelectResults,
}

#[derive(Deserialize)]
struct SparqlSelectHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize)]
struct SparqlSelectResults {
    bindings: Vec<HashMap<String, SparqlSelectBinding>>,
}

/// Wire form of a single binding, dispatched on its `type` member.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum SparqlSelectBinding {
    #[serde(rename = "uri")]
    Uri { value: String },
    #[serde(rename = "literal", alias = "typed-literal")]
    Literal {
        value: String,
        datatype: Option<String>,
        #[serde(rename = "xml:lang")]
        language: Option<String>,
    },
    #[serde(rename = "bnode")]
    BlankNode { value: String },
}

impl From<SparqlSelectBinding> for SelectValue {
    fn from(binding: SparqlSelectBinding) -> Self {
        match binding {
            SparqlSelectBinding::Uri { value } => Self::Uri(value),
            SparqlSelectBinding::Literal {
                value,
                datatype,
                language,
            } => Self::Literal {
                value,
                datatype,
                language,
            },
            SparqlSelectBinding::BlankNode { value } => Self::BlankNode(value),
        }
    }
}

/// Parse a SPARQL results JSON document of a SELECT query.
///
/// Unknown binding types (including RDF-star `triple` terms) are rejected.
pub fn parse_select_results(json: &str) -> Result<SelectResult> {
    let response: SparqlSelectResponse =
        serde_json::from_str(json).map_err(|e| TripleStoreError::ParseError {
            reason: format!("Failed to parse SELECT response: {e}"),
        })?;

    let rows = response
        .results
        .bindings
        .into_iter()
        .map(|binding| SelectRow {
            bindings: binding
                .into_iter()
                .map(|(var, value)| (var, SelectValue::from(value)))
                .collect(),
        })
        .collect();

    Ok(SelectResult {
        variables: response.head.vars,
        rows,
    })
}

fn parse_error(reason: String) -> TripleStoreError {
    TripleStoreError::ParseError { reason }
}
