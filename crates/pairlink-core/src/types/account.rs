//! Account records held by the account store

use serde::{Deserialize, Serialize};

/// A locally known account shared with a counterpart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Stable identifier of the account
    pub account_identifier: String,
    /// Public key of the peer that was granted access
    pub sender_id: String,
    /// Account address
    pub address: String,
    /// Account public key
    pub public_key: String,
    /// Network the account lives on
    pub network: String,
    /// Granted permission scopes
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Unix timestamp (ms) of when access was granted
    pub connected_at: u64,
}
