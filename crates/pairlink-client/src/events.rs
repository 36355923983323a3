//! Client event bus

use pairlink_core::Peer;
use pairlink_transport::Transport;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Discriminant of a [`ClientEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`ClientEvent::ActiveTransportSet`]
    ActiveTransportSet,
    /// See [`ClientEvent::InternalError`]
    InternalError,
}

/// Notification published by a client
pub enum ClientEvent<P: Peer> {
    /// The transport slot changed. `None` means it was cleared.
    ActiveTransportSet(Option<Arc<dyn Transport<P>>>),
    /// Something failed that no caller is waiting on
    InternalError(String),
}

impl<P: Peer> ClientEvent<P> {
    /// Discriminant of this event
    pub fn kind(&self) -> EventKind {
        match self {
            ClientEvent::ActiveTransportSet(_) => EventKind::ActiveTransportSet,
            ClientEvent::InternalError(_) => EventKind::InternalError,
        }
    }
}

impl<P: Peer> Clone for ClientEvent<P> {
    fn clone(&self) -> Self {
        match self {
            ClientEvent::ActiveTransportSet(transport) => {
                ClientEvent::ActiveTransportSet(transport.clone())
            }
            ClientEvent::InternalError(message) => ClientEvent::InternalError(message.clone()),
        }
    }
}

impl<P: Peer> fmt::Debug for ClientEvent<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientEvent::ActiveTransportSet(transport) => f
                .debug_tuple("ActiveTransportSet")
                .field(&transport.as_ref().map(|t| t.transport_type()))
                .finish(),
            ClientEvent::InternalError(message) => {
                f.debug_tuple("InternalError").field(message).finish()
            }
        }
    }
}

/// Fan-out of client events to any number of subscribers.
///
/// Clones share one channel. Emitting never blocks. Subscribers that fall
/// more than `capacity` events behind observe a lag error and skip ahead.
pub struct EventBus<P: Peer> {
    sender: broadcast::Sender<ClientEvent<P>>,
}

impl<P: Peer> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<P: Peer> EventBus<P> {
    /// Create a bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent<P>> {
        self.sender.subscribe()
    }

    /// Publish an event, returning how many subscribers will see it
    pub fn emit(&self, event: ClientEvent<P>) -> usize {
        let kind = event.kind();
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!(?kind, "No event subscribers");
                0
            }
        }
    }

    /// Current number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
