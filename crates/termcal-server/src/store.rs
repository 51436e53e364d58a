//! Durable key-value storage for serialized credential records.
//!
//! The store only sees opaque text blobs keyed by user id. Encoding and
//! decoding live in the cache.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::OptionalExtension;
use termcal_providers::BoxFuture;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

const CREATE_USERS_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS users (uuid TEXT PRIMARY KEY, data TEXT NOT NULL)";

const UPSERT_USER: &str = "INSERT INTO users (uuid, data) VALUES (?1, ?2)
     ON CONFLICT(uuid) DO UPDATE SET data = excluded.data";

const SELECT_USER: &str = "SELECT data FROM users WHERE uuid = ?1";

/// Point lookup and upsert of one blob per id.
pub trait CredentialStore: Send + Sync {
    /// Returns the blob stored under `id`, or `None`.
    fn load<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<String>>>;

    /// Inserts or replaces the blob stored under `id`.
    fn upsert<'a>(&'a self, id: &'a str, data: String) -> BoxFuture<'a, StoreResult<()>>;
}

/// SQLite-backed store with a single `users` table.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCredentialStore").finish_non_exhaustive()
    }
}

impl SqliteCredentialStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).await?;
        let store = Self::with_connection(conn).await?;
        info!(path = %path.display(), "opened credential store");
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.call(|conn| {
            conn.execute(CREATE_USERS_TABLE, [])?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn load<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<String>>> {
        let key = id.to_string();
        Box::pin(async move {
            let data = self
                .conn
                .call(move |conn| {
                    let data = conn
                        .query_row(SELECT_USER, [&key], |row| row.get::<_, String>(0))
                        .optional()?;
                    Ok(data)
                })
                .await?;
            debug!(id, found = data.is_some(), "credential store lookup");
            Ok(data)
        })
    }

    fn upsert<'a>(&'a self, id: &'a str, data: String) -> BoxFuture<'a, StoreResult<()>> {
        let key = id.to_string();
        Box::pin(async move {
            self.conn
                .call(move |conn| {
                    conn.execute(UPSERT_USER, [&key, &data])?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }
}

/// Process-local store, mostly for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    rows: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes a raw blob, bypassing any encoding.
    pub fn insert_raw(&self, id: impl Into<String>, data: impl Into<String>) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.insert(id.into(), data.into());
        }
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

impl CredentialStore for MemoryCredentialStore {
    fn load<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<String>>> {
        let result = self
            .rows
            .lock()
            .map(|rows| rows.get(id).cloned())
            .map_err(poisoned);
        Box::pin(async move { result })
    }

    fn upsert<'a>(&'a self, id: &'a str, data: String) -> BoxFuture<'a, StoreResult<()>> {
        let result = self
            .rows
            .lock()
            .map(|mut rows| {
                rows.insert(id.to_string(), data);
            })
            .map_err(poisoned);
        Box::pin(async move { result })
    }
}
