//! JSON array persisted under a single storage key

use crate::{PairlinkError, Result, Storage, StorageKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Read-modify-write access to a JSON list.
///
/// Mutations are serialized by `write_lock` so concurrent writers do not
/// lose each other's updates.
pub(crate) struct ListStore {
    storage: Arc<dyn Storage>,
    key: StorageKey,
    write_lock: Mutex<()>,
}

impl ListStore {
    pub(crate) fn new(storage: Arc<dyn Storage>, key: StorageKey) -> Self {
        Self {
            storage,
            key,
            write_lock: Mutex::new(()),
        }
    }

    pub(crate) fn key(&self) -> StorageKey {
        self.key
    }

    pub(crate) async fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        match self.storage.get(self.key).await? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|err| {
                PairlinkError::storage(format!("corrupt list under {}: {err}", self.key))
            }),
        }
    }

    async fn save<T: Serialize>(&self, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)
            .map_err(|err| PairlinkError::storage(format!("encode {}: {err}", self.key)))?;
        self.storage.set(self.key, raw).await
    }

    /// Apply `update` to the stored list and persist the result
    pub(crate) async fn update<T, F>(&self, update: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>),
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load::<T>().await?;
        update(&mut items);
        self.save(&items).await
    }

    pub(crate) async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.storage.delete(self.key).await
    }
}
