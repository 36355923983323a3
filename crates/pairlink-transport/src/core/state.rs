//! Shared transport state
//!
//! `TransportCore` is what every variant embeds: the connection status, the
//! peer store and channel it is bound to for life, and the listener list.
//!
//! # Invariants
//!
//! - Peer store and channel are fixed at construction and never rebound
//! - A peer is persisted before its channel subscription is opened. A
//!   failure in between leaves a persisted but unsubscribed peer, which is
//!   not rolled back here.

use super::listeners::{Listener, ListenerRegistry};
use futures::future::join_all;
use pairlink_core::{
    Channel, ConnectionContext, InboundPayload, MessageCallback, PairlinkError, Peer, PeerStore,
    Result, TransportStatus,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info_span, warn, Span};

/// State and behavior shared by all transport variants
pub struct TransportCore<P: Peer> {
    name: String,
    status: RwLock<TransportStatus>,
    peer_store: Arc<dyn PeerStore<P>>,
    channel: Arc<dyn Channel<P>>,
    listeners: ListenerRegistry,
    span: Span,
}

impl<P: Peer> TransportCore<P> {
    /// Bind a peer store and channel. Performs no I/O.
    pub fn new(
        name: impl Into<String>,
        peer_store: Arc<dyn PeerStore<P>>,
        channel: Arc<dyn Channel<P>>,
    ) -> Self {
        let name = name.into();
        let span = info_span!("transport", name = %name);
        Self::with_span(name, peer_store, channel, span)
    }

    /// Bind with an explicit logging span
    pub fn with_span(
        name: impl Into<String>,
        peer_store: Arc<dyn PeerStore<P>>,
        channel: Arc<dyn Channel<P>>,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            status: RwLock::new(TransportStatus::NotConnected),
            peer_store,
            channel,
            listeners: ListenerRegistry::new(span.clone()),
            span,
        }
    }

    /// Name of the app owning this transport
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logging span of this transport
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Channel capability this transport delivers through
    pub fn channel(&self) -> &Arc<dyn Channel<P>> {
        &self.channel
    }

    /// Peer store this transport persists to
    pub fn peer_store(&self) -> &Arc<dyn PeerStore<P>> {
        &self.peer_store
    }

    /// Current connection status
    pub fn connection_status(&self) -> TransportStatus {
        *self.status.read()
    }

    /// Record a new connection status
    pub fn set_connection_status(&self, status: TransportStatus) {
        *self.status.write() = status;
    }

    /// Send `payload` to `recipient`, or to every known peer when `None`.
    ///
    /// Broadcast deliveries run concurrently and are all awaited, but only
    /// the first dispatched delivery's result is returned. Callers must not
    /// read a broadcast `Ok` as "every peer received it".
    pub async fn send(&self, payload: &str, recipient: Option<&str>) -> Result<()> {
        let known_peers = self.get_peers().await?;

        match recipient {
            Some(public_key) => {
                let peer = known_peers
                    .iter()
                    .find(|peer| peer.public_key() == public_key)
                    .ok_or_else(|| PairlinkError::peer_unknown(public_key))?;
                self.channel.send_message(peer, payload).await
            }
            None => {
                debug!(parent: &self.span, peers = known_peers.len(), "Broadcasting");
                let deliveries = known_peers
                    .iter()
                    .map(|peer| self.channel.send_message(peer, payload));
                let mut results = join_all(deliveries).await.into_iter();
                let first = results.next().unwrap_or(Ok(()));
                for failed in results.filter_map(|result| result.err()) {
                    warn!(parent: &self.span, error = %failed, "Broadcast delivery failed");
                }
                first
            }
        }
    }

    /// Register an inbound listener
    pub fn add_listener(&self, listener: Listener) {
        self.listeners.add(listener);
    }

    /// Unregister every entry of `listener`
    pub fn remove_listener(&self, listener: &Listener) -> usize {
        self.listeners.remove(listener)
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Fan an inbound message out to every listener, in registration order
    pub fn notify_listeners(&self, payload: &InboundPayload, context: &ConnectionContext) -> usize {
        self.listeners.notify(payload, context)
    }

    /// Callback for channels to route inbound messages into the listeners
    pub fn inbound_callback(&self) -> MessageCallback {
        self.listeners.as_callback()
    }

    /// All known peers
    pub async fn get_peers(&self) -> Result<Vec<P>> {
        self.peer_store.get_peers().await
    }

    /// Persist `peer` unless its key is already known.
    ///
    /// Returns whether the peer was newly stored.
    pub async fn persist_peer(&self, peer: P) -> Result<bool> {
        if self.peer_store.has_peer(peer.public_key()).await? {
            debug!(parent: &self.span, public_key = %peer.public_key(), "addPeer: peer already added, skipping");
            return Ok(false);
        }
        debug!(parent: &self.span, public_key = %peer.public_key(), name = %peer.name(), "addPeer");
        self.peer_store.add_peer(peer).await?;
        Ok(true)
    }

    /// Forget `peer` and tear down its subscription
    pub async fn remove_peer(&self, peer: &P) -> Result<()> {
        debug!(parent: &self.span, public_key = %peer.public_key(), "removePeer");
        self.peer_store.remove_peer(peer.public_key()).await?;
        self.channel.unsubscribe_from_peer(peer.public_key()).await
    }

    /// Forget every peer and tear down all subscriptions
    pub async fn remove_all_peers(&self) -> Result<()> {
        debug!(parent: &self.span, "removeAllPeers");
        self.peer_store.remove_all_peers().await?;
        self.channel.unsubscribe_from_all().await
    }
}
