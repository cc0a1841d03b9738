use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Database error: {0}")]
    DatabaseCreate(#[from] redb::DatabaseError),

    #[error("Database commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Database transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Failure of a single JSON fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure: connection refused, timeout, TLS, broken body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a status other than 200
    #[error("Unexpected status {0}")]
    Status(u16),

    /// Every allowed attempt answered with a retryable status
    #[error("Giving up after {attempts} attempts, last status {status}")]
    RetriesExhausted { status: u16, attempts: u32 },

    /// Response body is not valid JSON
    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response cache error: {0}")]
    Cache(#[from] CacheError),
}
