//! Credential cache in front of the durable store.
//!
//! Reads check memory first and fall through to the store. Writes go to the
//! store first and only reach memory once the store accepted them. Entries
//! never expire.
//!
//! By default a record read from the store is *not* copied into memory, so
//! every lookup of an uncached id hits the store until that id is `put`.
//! [`CachePolicy::populate_on_read`] changes that.

use std::collections::HashMap;
use std::sync::Arc;

use termcal_core::CredentialRecord;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{CredentialError, CredentialResult};
use crate::store::CredentialStore;

/// Cache behavior knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// Keep records that were loaded from the store on a memory miss.
    pub populate_on_read: bool,
}

impl CachePolicy {
    #[must_use]
    pub fn with_populate_on_read(mut self, populate: bool) -> Self {
        self.populate_on_read = populate;
        self
    }
}

/// Shared map of user id to credential record, backed by a store.
pub struct CredentialCache {
    store: Arc<dyn CredentialStore>,
    entries: RwLock<HashMap<String, CredentialRecord>>,
    policy: CachePolicy,
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CredentialCache {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_policy(store, CachePolicy::default())
    }

    pub fn with_policy(store: Arc<dyn CredentialStore>, policy: CachePolicy) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Resolves the record for `id`.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::NotFound`] when neither memory nor the store has it
    /// - [`CredentialError::CorruptRecord`] when the stored blob does not decode
    /// - [`CredentialError::Persistence`] when the store read fails
    pub async fn get(&self, id: &str) -> CredentialResult<CredentialRecord> {
        if let Some(record) = self.entries.read().await.get(id) {
            debug!(id, "credential cache hit");
            return Ok(record.clone());
        }

        debug!(id, "credential cache miss, reading store");
        let data = self
            .store
            .load(id)
            .await
            .map_err(|e| CredentialError::persistence(id, e))?
            .ok_or_else(|| CredentialError::not_found(id))?;

        let record: CredentialRecord =
            serde_json::from_str(&data).map_err(|source| CredentialError::CorruptRecord {
                id: id.to_string(),
                source,
            })?;

        if self.policy.populate_on_read {
            self.entries
                .write()
                .await
                .insert(id.to_string(), record.clone());
        }
        Ok(record)
    }

    /// Upserts `record` into the store, then into memory.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Persistence`] if the store write fails;
    /// memory is left untouched in that case.
    pub async fn put(&self, record: CredentialRecord) -> CredentialResult<()> {
        let data = serde_json::to_string(&record).map_err(|source| {
            CredentialError::CorruptRecord {
                id: record.id.clone(),
                source,
            }
        })?;

        self.store
            .upsert(&record.id, data)
            .await
            .map_err(|e| CredentialError::persistence(&record.id, e))?;

        info!(id = %record.id, "stored credential");
        self.entries.write().await.insert(record.id.clone(), record);
        Ok(())
    }

    /// Returns true if `id` is held in memory.
    pub async fn contains(&self, id: &str) -> bool {
        self.entries.read().await.contains_key(id)
    }

    /// Number of records held in memory.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
