//! Post-message transport variant

use super::channel::PostMessageChannel;
use super::hub::MessageHub;
use crate::core::{Transport, TransportCore};
use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use pairlink_core::{
    Peer, PostMessagePairingRequest, Result, Storage, StorageKey, StoragePeerManager,
    TransportStatus, TransportType,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Transport over a [`MessageHub`], persisting peers under one storage key
pub struct PostMessageTransport<P: Peer = PostMessagePairingRequest> {
    core: TransportCore<P>,
    storage_key: StorageKey,
    public_key: String,
}

impl<P: Peer> PostMessageTransport<P> {
    /// Wire a transport. Performs no I/O and does not connect.
    pub fn new(
        name: impl Into<String>,
        signing_key: SigningKey,
        hub: MessageHub,
        storage: Arc<dyn Storage>,
        storage_key: StorageKey,
    ) -> Self {
        let channel = PostMessageChannel::new(signing_key, hub);
        let public_key = channel.public_key().to_string();
        let peers = StoragePeerManager::<P>::new(storage, storage_key);
        Self {
            core: TransportCore::new(name, Arc::new(peers), Arc::new(channel)),
            storage_key,
            public_key,
        }
    }

    /// Whether post-message delivery is usable through `hub`
    pub fn is_available(hub: &MessageHub) -> bool {
        hub.is_open()
    }

    /// Storage key holding this transport's known peers
    pub fn storage_key(&self) -> StorageKey {
        self.storage_key
    }

    /// Hex public key of this side
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    async fn listen_to_stored_peers(&self) -> Result<()> {
        for peer in self.core.get_peers().await? {
            self.listen(peer.public_key()).await?;
        }
        Ok(())
    }
}

impl PostMessageTransport<PostMessagePairingRequest> {
    /// Wallet-side transport
    pub fn wallet(
        name: impl Into<String>,
        signing_key: SigningKey,
        hub: MessageHub,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self::new(
            name,
            signing_key,
            hub,
            storage,
            StorageKey::TransportPostMessagePeersWallet,
        )
    }

    /// Dapp-side transport
    pub fn dapp(
        name: impl Into<String>,
        signing_key: SigningKey,
        hub: MessageHub,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self::new(
            name,
            signing_key,
            hub,
            storage,
            StorageKey::TransportPostMessagePeersDapp,
        )
    }
}

#[async_trait]
impl<P: Peer> Transport<P> for PostMessageTransport<P> {
    fn core(&self) -> &TransportCore<P> {
        &self.core
    }

    fn transport_type(&self) -> TransportType {
        TransportType::PostMessage
    }

    /// Subscribe to every stored peer, then mark the transport connected.
    ///
    /// Any failure leaves the status `NotConnected`. Peers persisted by an
    /// `add_peer` whose subscription failed are picked up again here.
    async fn connect(&self) -> Result<()> {
        debug!(parent: self.core.span(), "connect");
        self.core.set_connection_status(TransportStatus::Connecting);

        if let Err(err) = self.listen_to_stored_peers().await {
            warn!(parent: self.core.span(), error = %err, "connect failed");
            self.core.set_connection_status(TransportStatus::NotConnected);
            return Err(err);
        }

        self.core.set_connection_status(TransportStatus::Connected);
        Ok(())
    }

    async fn listen(&self, public_key: &str) -> Result<()> {
        debug!(parent: self.core.span(), public_key, "listen");
        self.core
            .channel()
            .listen_for_peer(public_key, self.core.inbound_callback())
            .await
    }
}
