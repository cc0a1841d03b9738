use thiserror::Error;

use crate::config::ConfigError;

/// Top-level application error that composes all subsystem errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Triple store and RDF file errors
    #[error("Triple store error: {0}")]
    TripleStore(#[from] prov_triple_store::error::TripleStoreError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] prov_http_cache::FetchError),

    #[error("File error: {0}")]
    Files(#[from] prov_files::FilesError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking task panicked or was cancelled
    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
