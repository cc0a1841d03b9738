use thiserror::Error;

/// Triple store specific errors
#[derive(Error, Debug)]
pub enum TripleStoreError {
    /// Semaphore closed
    #[error("Semaphore closed")]
    SemaphoreClosed,

    /// HTTP request failed (connection refused, timeout, broken transport)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Triple store returned a non-success status
    #[error("Triple store error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// Failed to parse a response body or a result binding
    #[error("Failed to parse response: {reason}")]
    ParseError { reason: String },

    /// Failed to serialize RDF
    #[error("Failed to serialize RDF: {reason}")]
    Serialization { reason: String },

    /// RDF document format could not be determined or is not supported
    #[error("Unsupported RDF format: {reason}")]
    InvalidFormat { reason: String },

    /// Invalid SPARQL query
    #[error("Invalid SPARQL query: {reason}")]
    InvalidQuery { reason: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, TripleStoreError>;
