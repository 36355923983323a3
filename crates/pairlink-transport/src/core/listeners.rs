//! Inbound listener fan-out
//!
//! Listeners are identified by their `Arc` allocation. Registering the same
//! listener twice yields two entries; removing it drops every entry that
//! points at it.

use pairlink_core::{ConnectionContext, InboundPayload, MessageCallback};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn, Span};

/// Callback invoked for every inbound message
pub type Listener = Arc<dyn Fn(&InboundPayload, &ConnectionContext) + Send + Sync>;

/// Ordered set of inbound listeners, shared with channel callbacks
#[derive(Clone)]
pub struct ListenerRegistry {
    listeners: Arc<RwLock<Vec<Listener>>>,
    span: Span,
}

impl ListenerRegistry {
    /// Create an empty registry logging under `span`
    pub fn new(span: Span) -> Self {
        Self {
            listeners: Arc::new(RwLock::new(Vec::new())),
            span,
        }
    }

    /// Append a listener
    pub fn add(&self, listener: Listener) {
        debug!(parent: &self.span, "addListener");
        self.listeners.write().push(listener);
    }

    /// Remove every entry of `listener`, returning how many were removed
    pub fn remove(&self, listener: &Listener) -> usize {
        debug!(parent: &self.span, "removeListener");
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|existing| !Arc::ptr_eq(existing, listener));
        before - listeners.len()
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Invoke every listener in registration order.
    ///
    /// Returns the number of listeners invoked. Zero means the message was
    /// most likely dropped, which is logged as a warning.
    pub fn notify(&self, payload: &InboundPayload, context: &ConnectionContext) -> usize {
        // Snapshot so listeners may add or remove listeners while running.
        let snapshot: Vec<Listener> = self.listeners.read().clone();

        if snapshot.is_empty() {
            warn!(parent: &self.span, sender = %context.id, "notifyListeners: 0 listeners notified!");
            return 0;
        }

        debug!(parent: &self.span, count = snapshot.len(), "Notifying listeners");
        for listener in &snapshot {
            listener(payload, context);
        }
        snapshot.len()
    }

    /// Channel callback that feeds this registry
    pub fn as_callback(&self) -> MessageCallback {
        let registry = self.clone();
        Arc::new(move |payload: InboundPayload, context: ConnectionContext| {
            registry.notify(&payload, &context);
        })
    }
}
