//! Role-specific clients
//!
//! Both roles wrap a [`Client`] with a handler installed and the sender id
//! stamped on their outgoing messages. Everything else is reached through
//! [`client()`](WalletClient::client).

use crate::client::Client;
use crate::config::ClientConfig;
use crate::dispatch::RequestHandler;
use pairlink_core::{
    AccountStore, BaseMessage, DomainError, MessageType, Peer, PostMessagePairingRequest, Result,
};
use std::sync::Arc;
use tracing::warn;

/// Wallet side: answers requests coming from dapps
pub struct WalletClient<P: Peer = PostMessagePairingRequest> {
    client: Client<P>,
    sender_id: String,
}

impl<P: Peer> WalletClient<P> {
    /// Create a wallet client; `handler` receives every decoded request
    pub fn new(
        config: ClientConfig,
        accounts: Arc<dyn AccountStore>,
        handler: Arc<dyn RequestHandler>,
        sender_id: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::new(config, accounts)?.with_handler(handler),
            sender_id: sender_id.into(),
        })
    }

    /// Underlying client
    pub fn client(&self) -> &Client<P> {
        &self.client
    }

    /// Sender id stamped on outgoing messages
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Confirm receipt of `request` to its sender
    pub async fn acknowledge(&self, request: &BaseMessage) -> Result<()> {
        let ack = BaseMessage::acknowledge(request, self.sender_id.as_str());
        self.client.respond(&ack, &request.sender_id).await
    }

    /// Answer `request` with `response` addressed to its sender
    pub async fn respond(&self, request: &BaseMessage, response: &BaseMessage) -> Result<()> {
        self.client.respond(response, &request.sender_id).await
    }

    /// Answer `request` with a domain error in its `[KIND]:detail` form
    pub async fn respond_error(&self, request: &BaseMessage, error: &DomainError) -> Result<()> {
        warn!(parent: self.client.span(), id = %request.id, error = %error, "Rejecting request");
        let response = BaseMessage::error_response(request, self.sender_id.as_str(), error);
        self.client.respond(&response, &request.sender_id).await
    }
}

/// Dapp side: issues requests to wallets and handles their answers
pub struct DAppClient<P: Peer = PostMessagePairingRequest> {
    client: Client<P>,
    sender_id: String,
}

impl<P: Peer> DAppClient<P> {
    /// Create a dapp client; `handler` receives every decoded answer
    pub fn new(
        config: ClientConfig,
        accounts: Arc<dyn AccountStore>,
        handler: Arc<dyn RequestHandler>,
        sender_id: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::new(config, accounts)?.with_handler(handler),
            sender_id: sender_id.into(),
        })
    }

    /// Underlying client
    pub fn client(&self) -> &Client<P> {
        &self.client
    }

    /// Sender id stamped on outgoing messages
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Send a new request to `recipient`, or to every paired wallet with
    /// `None`, and return it so the caller can match the answer by id.
    ///
    /// Refused with `TOO_MANY_OPERATIONS` when over the rate limit.
    pub async fn request(
        &self,
        message_type: MessageType,
        payload: serde_json::Value,
        recipient: Option<&str>,
    ) -> Result<BaseMessage> {
        if self.client.add_request_and_check_rate_limited() {
            warn!(parent: self.client.span(), ?message_type, "Request refused, rate limit reached");
            return Err(DomainError::too_many_operations().into());
        }
        let message = BaseMessage::new(self.sender_id.as_str(), message_type, payload);
        self.client.send_message(&message, recipient).await?;
        Ok(message)
    }
}
