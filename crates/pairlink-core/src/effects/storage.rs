//! Key/value persistence capability

use crate::{Result, StorageKey};
use async_trait::async_trait;

/// Text storage addressed by [`StorageKey`]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: StorageKey) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: StorageKey, value: String) -> Result<()>;

    /// Remove the value stored under `key`
    async fn delete(&self, key: StorageKey) -> Result<()>;
}
