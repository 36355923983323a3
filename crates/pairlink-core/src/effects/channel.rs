//! Message delivery capability
//!
//! A channel knows how to reach a peer and how to receive from one. It owns
//! whatever cryptographic identity that requires. Timeouts, if any, are the
//! channel's policy; the transport above never cancels a delivery.

use crate::{ConnectionContext, Peer, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Raw inbound payload as handed over by a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// Textual payload, the only kind the client decodes
    Text(String),
    /// Anything else
    Binary(Vec<u8>),
}

impl InboundPayload {
    /// Borrow the text, if textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            InboundPayload::Text(text) => Some(text),
            InboundPayload::Binary(_) => None,
        }
    }
}

impl From<String> for InboundPayload {
    fn from(text: String) -> Self {
        InboundPayload::Text(text)
    }
}

impl From<&str> for InboundPayload {
    fn from(text: &str) -> Self {
        InboundPayload::Text(text.to_string())
    }
}

/// Callback a channel invokes for every message received from a peer
pub type MessageCallback = Arc<dyn Fn(InboundPayload, ConnectionContext) + Send + Sync>;

/// Delivery mechanism bound to a transport
#[async_trait]
pub trait Channel<P: Peer>: Send + Sync {
    /// Deliver `payload` to `peer`
    async fn send_message(&self, peer: &P, payload: &str) -> Result<()>;

    /// Start routing messages from `public_key` into `callback`
    async fn listen_for_peer(&self, public_key: &str, callback: MessageCallback) -> Result<()>;

    /// Stop receiving from `public_key`
    async fn unsubscribe_from_peer(&self, public_key: &str) -> Result<()>;

    /// Stop receiving from everyone
    async fn unsubscribe_from_all(&self) -> Result<()>;
}
