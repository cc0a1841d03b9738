use std::{path::Path, sync::Arc};

use redb::{Database, ReadableDatabase, ReadableTableMetadata, TableDefinition};
use serde_json::Value;

use crate::error::CacheError;

/// URL → JSON body of a successful response.
const RESPONSES: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("responses");

/// Persistent cache of JSON responses keyed by request URL.
///
/// Entries never expire. Cloning shares the underlying database.
#[derive(Clone)]
pub struct ResponseCache {
    db: Arc<Database>,
}

impl ResponseCache {
    /// Open or create the cache database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let db = Database::create(&path)?;

            // Create the table up-front so read transactions can always open it
            let write_txn = db.begin_write()?;
            {
                let _responses = write_txn.open_table(RESPONSES)?;
            }
            write_txn.commit()?;

            tracing::debug!(path = %path.display(), "Opened HTTP response cache");

            Ok(Self { db: Arc::new(db) })
        })
        .await?
    }

    async fn run_blocking<F, T>(&self, f: F) -> Result<T, CacheError>
    where
        F: FnOnce(&Database) -> Result<T, CacheError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db)).await?
    }

    /// Cached body for `url`, if any.
    pub async fn get(&self, url: &str) -> Result<Option<Value>, CacheError> {
        let url = url.to_string();
        self.run_blocking(move |db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(RESPONSES)?;

            match table.get(url.as_str())? {
                Some(body) => Ok(Some(serde_json::from_slice(body.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Store `body` for `url`, replacing any previous entry.
    pub async fn store(&self, url: &str, body: &Value) -> Result<(), CacheError> {
        let url = url.to_string();
        let bytes = serde_json::to_vec(body)?;
        self.run_blocking(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(RESPONSES)?;
                table.insert(url.as_str(), bytes.as_slice())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    /// Drop the entry for `url`. Returns true if it existed.
    pub async fn remove(&self, url: &str) -> Result<bool, CacheError> {
        let url = url.to_string();
        self.run_blocking(move |db| {
            let write_txn = db.begin_write()?;
            let removed = {
                let mut table = write_txn.open_table(RESPONSES)?;
                table.remove(url.as_str())?.is_some()
            };
            write_txn.commit()?;
            Ok(removed)
        })
        .await
    }

    /// Number of cached responses.
    pub async fn len(&self) -> Result<u64, CacheError> {
        self.run_blocking(|db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(RESPONSES)?;
            Ok(table.len()?)
        })
        .await
    }
}
