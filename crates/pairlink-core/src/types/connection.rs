//! Connection state and per-message context

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an inbound message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// A browser extension or sibling window
    Extension,
    /// A website embedding the SDK
    Website,
    /// A relay-based peer-to-peer channel
    P2p,
}

/// Metadata describing how an inbound message arrived.
///
/// Ephemeral: built per message and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionContext {
    /// Channel the message arrived on
    pub origin: Origin,
    /// Identifier of the sender on that channel (its public key)
    pub id: String,
}

impl ConnectionContext {
    /// Create a context
    pub fn new(origin: Origin, id: impl Into<String>) -> Self {
        Self {
            origin,
            id: id.into(),
        }
    }
}

/// Connection state of a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportStatus {
    /// No channel established
    #[default]
    NotConnected,
    /// Handshake in progress (used by variants that need it)
    Connecting,
    /// Channel established
    Connected,
}

/// Which concrete transport variant is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    /// Sibling-window / extension messaging
    PostMessage,
    /// Relay-based peer-to-peer messaging
    P2p,
}

impl TransportType {
    /// Stable name of the transport type
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::PostMessage => "post_message",
            TransportType::P2p => "p2p",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
