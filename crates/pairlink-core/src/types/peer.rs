//! Peer identity types
//!
//! A peer is a remote counterpart identified by its public key. The routing
//! metadata differs per transport, so each transport binds its own peer-info
//! variant through the [`Peer`] trait.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Identity of a remote counterpart
pub trait Peer: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Unique identifier of the peer (hex-encoded public key)
    fn public_key(&self) -> &str;

    /// Display name of the peer
    fn name(&self) -> &str;
}

/// Pairing data exchanged over the post-message transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessagePairingRequest {
    /// Display name of the counterpart
    pub name: String,
    /// Hex-encoded public key of the counterpart
    pub public_key: String,
    /// Optional icon URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Optional application URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_url: Option<String>,
}

impl PostMessagePairingRequest {
    /// Create pairing data with only the required fields
    pub fn new(name: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_key: public_key.into(),
            icon: None,
            app_url: None,
        }
    }
}

impl Peer for PostMessagePairingRequest {
    fn public_key(&self) -> &str {
        &self.public_key
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Pairing data exchanged over a relay (peer-to-peer) transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct P2pPairingRequest {
    /// Display name of the counterpart
    pub name: String,
    /// Hex-encoded public key of the counterpart
    pub public_key: String,
    /// Relay server the counterpart is reachable through
    pub relay_server: String,
    /// Protocol version spoken by the counterpart
    pub version: String,
}

impl Peer for P2pPairingRequest {
    fn public_key(&self) -> &str {
        &self.public_key
    }

    fn name(&self) -> &str {
        &self.name
    }
}
