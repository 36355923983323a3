//! Core transport trait definitions

use super::listeners::Listener;
use super::state::TransportCore;
use async_trait::async_trait;
use pairlink_core::{Peer, Result, TransportStatus, TransportType};
use tracing::debug;

/// Core transport interface for all transport implementations.
///
/// Variants embed a [`TransportCore`] and supply `listen`; everything else
/// has a default that variants may override (typically `connect` and
/// `reconnect`, to run a real handshake).
#[async_trait]
pub trait Transport<P: Peer>: Send + Sync {
    /// Shared state of this transport
    fn core(&self) -> &TransportCore<P>;

    /// Which variant this is
    fn transport_type(&self) -> TransportType;

    /// Name of the app owning this transport
    fn name(&self) -> &str {
        self.core().name()
    }

    /// Current connection status
    fn connection_status(&self) -> TransportStatus {
        self.core().connection_status()
    }

    /// Establish the underlying channel. Call once per session.
    async fn connect(&self) -> Result<()> {
        debug!(parent: self.core().span(), "connect");
        self.core().set_connection_status(TransportStatus::Connected);
        Ok(())
    }

    /// Re-establish the channel after a failed `connect`
    async fn reconnect(&self) -> Result<()> {
        debug!(parent: self.core().span(), "reconnect");
        Ok(())
    }

    /// Start routing inbound messages from `public_key` into the listeners
    async fn listen(&self, public_key: &str) -> Result<()>;

    /// Send to one known peer, or broadcast to all when `recipient` is `None`
    async fn send(&self, payload: &str, recipient: Option<&str>) -> Result<()> {
        self.core().send(payload, recipient).await
    }

    /// Register an inbound listener
    fn add_listener(&self, listener: Listener) {
        self.core().add_listener(listener);
    }

    /// Unregister an inbound listener
    fn remove_listener(&self, listener: &Listener) {
        self.core().remove_listener(listener);
    }

    /// All known peers
    async fn get_peers(&self) -> Result<Vec<P>> {
        self.core().get_peers().await
    }

    /// Persist a new peer and subscribe to it; known peers are skipped
    async fn add_peer(&self, peer: P) -> Result<()> {
        let public_key = peer.public_key().to_string();
        if self.core().persist_peer(peer).await? {
            self.listen(&public_key).await?;
        }
        Ok(())
    }

    /// Forget a peer and tear down its subscription
    async fn remove_peer(&self, peer: &P) -> Result<()> {
        self.core().remove_peer(peer).await
    }

    /// Forget every peer and tear down all subscriptions
    async fn remove_all_peers(&self) -> Result<()> {
        self.core().remove_all_peers().await
    }
}
