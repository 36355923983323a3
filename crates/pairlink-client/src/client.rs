//! Transport-owning client
//!
//! A `Client` owns one transport slot. Until the first `init`, every call
//! that needs a transport (`ready`, `get_peers`, `respond`, ...) waits on the
//! slot; once it settles they all observe the same instance.
//!
//! # Invariants
//!
//! - `init` installs at most one transport per slot; later `init` calls
//!   return the installed transport's type and drop their argument
//! - Only `set_transport` swaps a settled slot, and it does so by replacing
//!   the slot, never by re-settling it
//! - The inbound listener is attached to exactly the transport in the slot

use crate::config::ClientConfig;
use crate::dispatch::{InboundError, InboundPipeline, NotInstalledHandler, RequestHandler};
use crate::events::{ClientEvent, EventBus};
use crate::rate_limit::RateLimiter;
use pairlink_core::{
    AccountInfo, AccountStore, BaseMessage, JsonSerializer, Peer, ResettableFuture, Result,
    Serializer, TransportStatus, TransportType,
};
use pairlink_transport::{Listener, Transport};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, info_span, Span};

type TransportHandle<P> = Arc<dyn Transport<P>>;

struct WiredListener<P: Peer> {
    transport: TransportHandle<P>,
    listener: Listener,
}

struct TransportSlot<P: Peer> {
    future: ResettableFuture<TransportHandle<P>>,
    wired: Option<WiredListener<P>>,
}

fn same_transport<P: Peer>(a: &TransportHandle<P>, b: &TransportHandle<P>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

/// Client owning a single transport slot
pub struct Client<P: Peer> {
    config: ClientConfig,
    slot: RwLock<TransportSlot<P>>,
    accounts: Arc<dyn AccountStore>,
    serializer: Arc<dyn Serializer>,
    handler: Arc<dyn RequestHandler>,
    events: EventBus<P>,
    rate_limiter: Mutex<RateLimiter>,
    inbound_errors: mpsc::Sender<InboundError>,
    inbound_errors_rx: Mutex<Option<mpsc::Receiver<InboundError>>>,
    span: Span,
}

impl<P: Peer> Client<P> {
    /// Create a client with an empty transport slot.
    ///
    /// Inbound requests fail with `HandlerNotInstalled` until a handler is
    /// supplied through [`with_handler`](Self::with_handler).
    pub fn new(config: ClientConfig, accounts: Arc<dyn AccountStore>) -> Result<Self> {
        config.validate()?;
        let span = info_span!("client", name = %config.name);
        let (inbound_errors, receiver) = mpsc::channel(config.inbound_error_capacity);

        Ok(Self {
            rate_limiter: Mutex::new(RateLimiter::from_config(&config.rate_limit)),
            events: EventBus::new(config.event_capacity),
            config,
            slot: RwLock::new(TransportSlot {
                future: ResettableFuture::new(),
                wired: None,
            }),
            accounts,
            serializer: Arc::new(JsonSerializer),
            handler: Arc::new(NotInstalledHandler),
            inbound_errors,
            inbound_errors_rx: Mutex::new(Some(receiver)),
            span,
        })
    }

    /// Install the dispatch hook for decoded inbound requests
    pub fn with_handler(mut self, handler: Arc<dyn RequestHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// Replace the message codec
    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Log under an explicit span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Name of the app owning this client
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Logging span of this client
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Install `transport` unless one is already installed.
    ///
    /// Returns the type of whichever transport ends up in the slot. When the
    /// slot was already settled, `transport` is dropped untouched.
    pub async fn init(&self, transport: TransportHandle<P>) -> TransportType {
        {
            let mut slot = self.slot.write();
            if let Some(active) = slot.future.settled_value() {
                debug!(parent: &self.span, active = %active.transport_type(), "init: transport already set, keeping it");
                return active.transport_type();
            }
            slot.future.resolve(Arc::clone(&transport));
            self.rewire(&mut slot, Some(&transport));
        }

        info!(parent: &self.span, transport = %transport.transport_type(), "Transport initialized");
        self.events
            .emit(ClientEvent::ActiveTransportSet(Some(Arc::clone(&transport))));
        transport.transport_type()
    }

    /// Put `transport` into the slot, or clear the slot when `None`.
    ///
    /// A pending slot is settled in place. A settled slot is replaced by a
    /// fresh one, so handles taken from the old slot keep their old value.
    /// Emits [`ClientEvent::ActiveTransportSet`] either way.
    pub fn set_transport(&self, transport: Option<TransportHandle<P>>) {
        {
            let mut slot = self.slot.write();
            match &transport {
                Some(next) => {
                    if !slot.future.resolve(Arc::clone(next)) {
                        slot.future = ResettableFuture::settled(Arc::clone(next));
                    }
                }
                None => {
                    if slot.future.is_settled() {
                        slot.future = ResettableFuture::new();
                    }
                }
            }
            self.rewire(&mut slot, transport.as_ref());
        }

        debug!(parent: &self.span, active = ?transport.as_ref().map(|t| t.transport_type()), "setTransport");
        self.events.emit(ClientEvent::ActiveTransportSet(transport));
    }

    /// Clear the slot so the next `init` installs a fresh transport
    pub fn clear_transport(&self) {
        self.set_transport(None);
    }

    // Caller holds the slot write lock.
    fn rewire(&self, slot: &mut TransportSlot<P>, next: Option<&TransportHandle<P>>) {
        if let (Some(wired), Some(next)) = (&slot.wired, next) {
            if same_transport(&wired.transport, next) {
                return;
            }
        }
        if let Some(previous) = slot.wired.take() {
            previous.transport.remove_listener(&previous.listener);
        }
        if let Some(next) = next {
            let listener = self.inbound_pipeline().into_listener();
            next.add_listener(Arc::clone(&listener));
            slot.wired = Some(WiredListener {
                transport: Arc::clone(next),
                listener,
            });
        }
    }

    fn inbound_pipeline(&self) -> InboundPipeline<P> {
        InboundPipeline {
            serializer: Arc::clone(&self.serializer),
            handler: Arc::clone(&self.handler),
            errors: self.inbound_errors.clone(),
            events: self.events.clone(),
            span: self.span.clone(),
        }
    }

    /// Record a request and report whether the caller is over its rate limit.
    ///
    /// Advisory: nothing is blocked or rejected here.
    pub fn add_request_and_check_rate_limited(&self) -> bool {
        let limited = self.rate_limiter.lock().add_request_and_check(Instant::now());
        if limited {
            debug!(parent: &self.span, "Rate limit reached");
        }
        limited
    }

    /// Status of the installed transport, or `NotConnected` with none
    pub fn connection_status(&self) -> TransportStatus {
        self.slot
            .read()
            .future
            .settled_value()
            .map_or(TransportStatus::NotConnected, |transport| {
                transport.connection_status()
            })
    }

    /// The installed transport, if any, without waiting
    pub fn active_transport(&self) -> Option<TransportHandle<P>> {
        self.slot.read().future.settled_value()
    }

    /// Wait for a transport to be installed and return it
    pub async fn transport(&self) -> TransportHandle<P> {
        let future = self.slot.read().future.clone();
        future.await_value().await
    }

    /// Wait until a transport is installed
    pub async fn ready(&self) {
        self.transport().await;
    }

    /// All known accounts
    pub async fn get_accounts(&self) -> Result<Vec<AccountInfo>> {
        self.accounts.get_accounts().await
    }

    /// Look up one account
    pub async fn get_account(&self, account_identifier: &str) -> Result<Option<AccountInfo>> {
        self.accounts.get_account(account_identifier).await
    }

    /// Forget one account
    pub async fn remove_account(&self, account_identifier: &str) -> Result<()> {
        self.accounts.remove_account(account_identifier).await
    }

    /// Forget every account
    pub async fn remove_all_accounts(&self) -> Result<()> {
        self.accounts.remove_all_accounts().await
    }

    /// Peers known to the installed transport
    pub async fn get_peers(&self) -> Result<Vec<P>> {
        self.transport().await.get_peers().await
    }

    /// Pair with a peer through the installed transport
    pub async fn add_peer(&self, peer: P) -> Result<()> {
        self.transport().await.add_peer(peer).await
    }

    /// Unpair from a peer through the installed transport
    pub async fn remove_peer(&self, peer: &P) -> Result<()> {
        self.transport().await.remove_peer(peer).await
    }

    /// Unpair from every peer through the installed transport
    pub async fn remove_all_peers(&self) -> Result<()> {
        self.transport().await.remove_all_peers().await
    }

    /// Serialize `message` and send it to `recipient`, or broadcast with `None`
    pub async fn send_message(&self, message: &BaseMessage, recipient: Option<&str>) -> Result<()> {
        let text = self.serializer.serialize(message)?;
        debug!(parent: &self.span, id = %message.id, message_type = ?message.message_type, recipient, "Sending message");
        self.transport().await.send(&text, recipient).await
    }

    /// Send `message` to one known peer
    pub async fn respond(&self, message: &BaseMessage, recipient: &str) -> Result<()> {
        self.send_message(message, Some(recipient)).await
    }

    /// Take the receiver of inbound processing failures.
    ///
    /// Holds at most `inbound_error_capacity` reports; later ones are dropped
    /// until the owner drains it. Returns `None` after the first call.
    pub fn take_inbound_errors(&self) -> Option<mpsc::Receiver<InboundError>> {
        self.inbound_errors_rx.lock().take()
    }

    /// Subscribe to client events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent<P>> {
        self.events.subscribe()
    }

    /// Event bus of this client
    pub fn events(&self) -> &EventBus<P> {
        &self.events
    }
}
