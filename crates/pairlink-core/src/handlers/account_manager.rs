//! Account store backed by the storage capability

use super::list_store::ListStore;
use crate::{AccountInfo, AccountStore, Result, Storage, StorageKey};
use async_trait::async_trait;
use std::sync::Arc;

/// Accounts persisted as a JSON list under [`StorageKey::Accounts`]
pub struct StorageAccountManager {
    list: ListStore,
}

impl StorageAccountManager {
    /// Create a manager over `storage`
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            list: ListStore::new(storage, StorageKey::Accounts),
        }
    }
}

#[async_trait]
impl AccountStore for StorageAccountManager {
    async fn get_accounts(&self) -> Result<Vec<AccountInfo>> {
        self.list.load().await
    }

    async fn get_account(&self, account_identifier: &str) -> Result<Option<AccountInfo>> {
        Ok(self
            .get_accounts()
            .await?
            .into_iter()
            .find(|account| account.account_identifier == account_identifier))
    }

    async fn add_account(&self, account: AccountInfo) -> Result<()> {
        self.list
            .update(move |accounts: &mut Vec<AccountInfo>| {
                accounts.retain(|a| a.account_identifier != account.account_identifier);
                accounts.push(account);
            })
            .await
    }

    async fn remove_account(&self, account_identifier: &str) -> Result<()> {
        self.list
            .update(|accounts: &mut Vec<AccountInfo>| {
                accounts.retain(|a| a.account_identifier != account_identifier);
            })
            .await
    }

    async fn remove_all_accounts(&self) -> Result<()> {
        self.list.clear().await
    }
}
