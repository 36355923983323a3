//! In-process message bus standing in for the window messaging API

use pairlink_core::{PairlinkError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

/// A signed message in flight between two public keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Hex public key of the sender
    pub sender: String,
    /// Hex public key of the recipient
    pub recipient: String,
    /// Opaque text payload
    pub payload: String,
    /// Hex ed25519 signature of `payload` by `sender`
    pub signature: String,
}

/// Receiver of envelopes addressed to one subscription
pub type Inbox = Arc<dyn Fn(Envelope) + Send + Sync>;

#[derive(Default)]
struct HubState {
    // recipient -> sender -> inbox
    subscriptions: RwLock<HashMap<String, HashMap<String, Inbox>>>,
    closed: AtomicBool,
}

/// Shared bus connecting every post-message channel in the process.
///
/// Posting is fire-and-forget: an envelope nobody subscribed to is dropped.
#[derive(Clone, Default)]
pub struct MessageHub {
    state: Arc<HubState>,
}

impl MessageHub {
    /// Create an open hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the hub accepts subscriptions and posts
    pub fn is_open(&self) -> bool {
        !self.state.closed.load(Ordering::Acquire)
    }

    /// Close the hub and drop every subscription
    pub fn close(&self) {
        self.state.closed.store(true, Ordering::Release);
        self.state.subscriptions.write().clear();
    }

    /// Accept subscriptions and posts again after [`close`](Self::close).
    ///
    /// Subscriptions dropped by `close` are not restored.
    pub fn reopen(&self) {
        self.state.closed.store(false, Ordering::Release);
    }

    /// Route envelopes from `sender` to `recipient` into `inbox`.
    ///
    /// Replaces an existing subscription for the same pair.
    pub fn subscribe(&self, recipient: &str, sender: &str, inbox: Inbox) -> Result<()> {
        if !self.is_open() {
            return Err(PairlinkError::channel("message hub is closed"));
        }
        self.state
            .subscriptions
            .write()
            .entry(recipient.to_string())
            .or_default()
            .insert(sender.to_string(), inbox);
        Ok(())
    }

    /// Drop the subscription for one sender, returning whether it existed
    pub fn unsubscribe(&self, recipient: &str, sender: &str) -> bool {
        let mut subscriptions = self.state.subscriptions.write();
        let Some(inboxes) = subscriptions.get_mut(recipient) else {
            return false;
        };
        let removed = inboxes.remove(sender).is_some();
        if inboxes.is_empty() {
            subscriptions.remove(recipient);
        }
        removed
    }

    /// Drop every subscription of `recipient`, returning how many there were
    pub fn unsubscribe_all(&self, recipient: &str) -> usize {
        self.state
            .subscriptions
            .write()
            .remove(recipient)
            .map_or(0, |inboxes| inboxes.len())
    }

    /// Number of senders `recipient` is subscribed to
    pub fn subscription_count(&self, recipient: &str) -> usize {
        self.state
            .subscriptions
            .read()
            .get(recipient)
            .map_or(0, HashMap::len)
    }

    /// Deliver an envelope. Returns whether a subscriber received it.
    pub fn post(&self, envelope: Envelope) -> Result<bool> {
        if !self.is_open() {
            return Err(PairlinkError::channel("message hub is closed"));
        }

        // Clone the inbox out so delivery runs without the lock held.
        let inbox = self
            .state
            .subscriptions
            .read()
            .get(&envelope.recipient)
            .and_then(|inboxes| inboxes.get(&envelope.sender))
            .cloned();

        match inbox {
            Some(inbox) => {
                inbox(envelope);
                Ok(true)
            }
            None => {
                trace!(recipient = %envelope.recipient, sender = %envelope.sender, "No subscriber, envelope dropped");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn envelope(sender: &str, recipient: &str) -> Envelope {
        Envelope {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            payload: "hi".to_string(),
            signature: String::new(),
        }
    }

    #[test]
    fn test_post_routes_by_recipient_and_sender() {
        let hub = MessageHub::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        hub.subscribe("bob", "alice", Arc::new(move |env: Envelope| sink.lock().push(env)))
            .unwrap();

        assert!(hub.post(envelope("alice", "bob")).unwrap());
        assert!(!hub.post(envelope("carol", "bob")).unwrap());
        assert!(!hub.post(envelope("alice", "dave")).unwrap());
        assert_eq!(received.lock().len(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let hub = MessageHub::new();
        hub.subscribe("bob", "alice", Arc::new(|_: Envelope| {})).unwrap();
        hub.subscribe("bob", "carol", Arc::new(|_: Envelope| {})).unwrap();
        assert_eq!(hub.subscription_count("bob"), 2);

        assert!(hub.unsubscribe("bob", "alice"));
        assert!(!hub.unsubscribe("bob", "alice"));
        assert_eq!(hub.unsubscribe_all("bob"), 1);
        assert_eq!(hub.subscription_count("bob"), 0);
    }

    #[test]
    fn test_closed_hub_rejects() {
        let hub = MessageHub::new();
        hub.close();
        assert!(!hub.is_open());
        assert!(hub.subscribe("bob", "alice", Arc::new(|_: Envelope| {})).is_err());
        assert!(hub.post(envelope("alice", "bob")).is_err());
    }

    #[test]
    fn test_reopen_accepts_new_subscriptions() {
        let hub = MessageHub::new();
        hub.subscribe("bob", "alice", Arc::new(|_: Envelope| {})).unwrap();
        hub.close();
        hub.reopen();

        assert!(hub.is_open());
        assert_eq!(hub.subscription_count("bob"), 0);
        hub.subscribe("bob", "alice", Arc::new(|_: Envelope| {})).unwrap();
        assert!(hub.post(envelope("alice", "bob")).unwrap());
    }
}
