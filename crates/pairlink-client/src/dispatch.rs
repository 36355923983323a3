//! Inbound message dispatch
//!
//! Every inbound payload from the active transport is run through one
//! pipeline:
//!
//! 1. Binary payloads are dropped; the client only speaks text.
//! 2. Text is decoded by the serializer into a [`BaseMessage`].
//! 3. The message is handed to the installed [`RequestHandler`].
//!
//! A failure in steps 2 or 3 never propagates back into the transport. It is
//! logged and queued on the bounded inbound error channel so an owner can
//! observe it. When the queue is full the report is dropped; the log line
//! remains.

use crate::events::{ClientEvent, EventBus};
use pairlink_core::{
    BaseMessage, ConnectionContext, InboundPayload, PairlinkError, Peer, Result, Serializer,
};
use pairlink_transport::Listener;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, trace, warn, Span};

/// Receives decoded inbound messages.
///
/// Called synchronously on the delivering channel's context, so
/// implementations should hand long work off to a task.
pub trait RequestHandler: Send + Sync {
    /// Handle one decoded message from the peer described by `context`
    fn handle_request(&self, message: BaseMessage, context: &ConnectionContext) -> Result<()>;
}

impl<F> RequestHandler for F
where
    F: Fn(BaseMessage, &ConnectionContext) -> Result<()> + Send + Sync,
{
    fn handle_request(&self, message: BaseMessage, context: &ConnectionContext) -> Result<()> {
        self(message, context)
    }
}

/// Handler used until a role installs its own.
///
/// Every message fails with [`PairlinkError::HandlerNotInstalled`], which
/// signals an integration bug in the owning client.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotInstalledHandler;

impl RequestHandler for NotInstalledHandler {
    fn handle_request(&self, message: BaseMessage, _context: &ConnectionContext) -> Result<()> {
        Err(PairlinkError::handler_not_installed(format!(
            "no request handler for {:?} message {}",
            message.message_type, message.id
        )))
    }
}

/// An inbound message that could not be processed
#[derive(Debug, Clone)]
pub struct InboundError {
    /// Who sent it
    pub context: ConnectionContext,
    /// Id of the decoded message, when decoding got that far
    pub message_id: Option<String>,
    /// What went wrong
    pub error: PairlinkError,
}

/// Everything the inbound listener needs, captured by value
pub(crate) struct InboundPipeline<P: Peer> {
    pub(crate) serializer: Arc<dyn Serializer>,
    pub(crate) handler: Arc<dyn RequestHandler>,
    pub(crate) errors: mpsc::Sender<InboundError>,
    pub(crate) events: EventBus<P>,
    pub(crate) span: Span,
}

impl<P: Peer> InboundPipeline<P> {
    /// Run one payload through decode and dispatch
    pub(crate) fn process(&self, payload: &InboundPayload, context: &ConnectionContext) {
        let Some(text) = payload.as_text() else {
            trace!(parent: &self.span, sender = %context.id, "Dropping non-text payload");
            return;
        };

        let message = match self.serializer.deserialize(text) {
            Ok(message) => message,
            Err(err) => {
                warn!(parent: &self.span, sender = %context.id, error = %err, "Failed to decode inbound message");
                self.report(context, None, err);
                return;
            }
        };

        debug!(parent: &self.span, sender = %context.id, id = %message.id, message_type = ?message.message_type, "Dispatching inbound message");
        let message_id = message.id.clone();
        if let Err(err) = self.handler.handle_request(message, context) {
            if err.is_integration_fault() {
                error!(parent: &self.span, id = %message_id, error = %err, "Request handler not installed");
                self.events.emit(ClientEvent::InternalError(err.to_string()));
            } else {
                warn!(parent: &self.span, id = %message_id, error = %err, "Request handler failed");
            }
            self.report(context, Some(message_id), err);
        }
    }

    fn report(
        &self,
        context: &ConnectionContext,
        message_id: Option<String>,
        error: PairlinkError,
    ) {
        let report = InboundError {
            context: context.clone(),
            message_id,
            error,
        };
        match self.errors.try_send(report) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                trace!(parent: &self.span, "Inbound error queue full, report dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                trace!(parent: &self.span, "Inbound error receiver dropped");
            }
        }
    }

    /// Wrap the pipeline as a transport listener
    pub(crate) fn into_listener(self) -> Listener {
        Arc::new(move |payload: &InboundPayload, context: &ConnectionContext| {
            self.process(payload, context);
        })
    }
}
