//! Account persistence capability

use crate::{AccountInfo, Result};
use async_trait::async_trait;

/// Locally known accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// All known accounts
    async fn get_accounts(&self) -> Result<Vec<AccountInfo>>;

    /// Look up one account by identifier
    async fn get_account(&self, account_identifier: &str) -> Result<Option<AccountInfo>>;

    /// Store an account, replacing one with the same identifier
    async fn add_account(&self, account: AccountInfo) -> Result<()>;

    /// Forget one account
    async fn remove_account(&self, account_identifier: &str) -> Result<()>;

    /// Forget every account
    async fn remove_all_accounts(&self) -> Result<()>;
}
