//! Persistence keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a piece of persisted state lives in the storage capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    /// Known peers of a dapp using the relay transport
    TransportP2pPeersDapp,
    /// Known peers of a wallet using the relay transport
    TransportP2pPeersWallet,
    /// Known peers of a dapp using the post-message transport
    TransportPostMessagePeersDapp,
    /// Known peers of a wallet using the post-message transport
    TransportPostMessagePeersWallet,
    /// Locally known accounts
    Accounts,
}

impl StorageKey {
    /// Stable storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::TransportP2pPeersDapp => "pairlink:communication-peers-dapp",
            StorageKey::TransportP2pPeersWallet => "pairlink:communication-peers-wallet",
            StorageKey::TransportPostMessagePeersDapp => "pairlink:postmessage-peers-dapp",
            StorageKey::TransportPostMessagePeersWallet => "pairlink:postmessage-peers-wallet",
            StorageKey::Accounts => "pairlink:accounts",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
