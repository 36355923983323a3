//! Signed post-message channel

use super::hub::{Envelope, Inbox, MessageHub};
use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use pairlink_core::{
    Channel, ConnectionContext, InboundPayload, MessageCallback, Origin, PairlinkError, Peer,
    Result,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Channel capability over a [`MessageHub`].
///
/// Outbound payloads are signed with this side's key. Inbound envelopes are
/// only surfaced if their signature verifies against the key of the peer
/// they claim to come from.
pub struct PostMessageChannel {
    signing_key: SigningKey,
    public_key: String,
    hub: MessageHub,
}

impl PostMessageChannel {
    /// Create a channel with the given identity. Performs no I/O.
    pub fn new(signing_key: SigningKey, hub: MessageHub) -> Self {
        let public_key = hex::encode(signing_key.verifying_key().as_bytes());
        Self {
            signing_key,
            public_key,
            hub,
        }
    }

    /// Hex public key of this side
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Hub this channel posts to
    pub fn hub(&self) -> &MessageHub {
        &self.hub
    }

    /// Sign and wrap a payload for `recipient`
    pub fn seal(&self, recipient: &str, payload: &str) -> Envelope {
        let signature: Signature = self.signing_key.sign(payload.as_bytes());
        Envelope {
            sender: self.public_key.clone(),
            recipient: recipient.to_string(),
            payload: payload.to_string(),
            signature: hex::encode(signature.to_bytes()),
        }
    }
}

/// Decode a hex ed25519 public key
fn parse_verifying_key(public_key: &str) -> Result<VerifyingKey> {
    let bytes = hex::decode(public_key)
        .map_err(|err| PairlinkError::channel(format!("invalid public key {public_key}: {err}")))?;
    let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
        PairlinkError::channel(format!("public key {public_key} is not 32 bytes"))
    })?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|err| PairlinkError::channel(format!("invalid public key {public_key}: {err}")))
}

fn verify(key: &VerifyingKey, envelope: &Envelope) -> bool {
    let Ok(bytes) = hex::decode(&envelope.signature) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&bytes) else {
        return false;
    };
    key.verify_strict(envelope.payload.as_bytes(), &signature).is_ok()
}

#[async_trait]
impl<P: Peer> Channel<P> for PostMessageChannel {
    async fn send_message(&self, peer: &P, payload: &str) -> Result<()> {
        let envelope = self.seal(peer.public_key(), payload);
        if !self.hub.post(envelope)? {
            debug!(recipient = %peer.public_key(), "Recipient not listening, message dropped");
        }
        Ok(())
    }

    async fn listen_for_peer(&self, public_key: &str, callback: MessageCallback) -> Result<()> {
        let key = parse_verifying_key(public_key)?;
        let sender = public_key.to_string();

        let inbox: Inbox = Arc::new(move |envelope: Envelope| {
            if !verify(&key, &envelope) {
                warn!(sender = %envelope.sender, "Dropping envelope with invalid signature");
                return;
            }
            let context = ConnectionContext::new(Origin::Extension, sender.clone());
            callback(InboundPayload::Text(envelope.payload), context);
        });

        self.hub.subscribe(&self.public_key, public_key, inbox)
    }

    async fn unsubscribe_from_peer(&self, public_key: &str) -> Result<()> {
        self.hub.unsubscribe(&self.public_key, public_key);
        Ok(())
    }

    async fn unsubscribe_from_all(&self) -> Result<()> {
        self.hub.unsubscribe_all(&self.public_key);
        Ok(())
    }
}
