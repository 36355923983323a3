//! Structured message envelope
//!
//! The transport only carries opaque text. At the client boundary that text
//! is decoded by the serializer into a `BaseMessage`. The payload is kept as
//! a JSON value; interpreting it is the request handler's business.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Protocol version stamped on outgoing messages
pub const PROTOCOL_VERSION: &str = "2";

/// Kind of a structured message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Ask for account access
    PermissionRequest,
    /// Ask for an operation to be signed and injected
    OperationRequest,
    /// Ask for an arbitrary payload to be signed
    SignPayloadRequest,
    /// Ask for a signed transaction to be broadcast
    BroadcastRequest,
    /// Answer to a permission request
    PermissionResponse,
    /// Answer to an operation request
    OperationResponse,
    /// Answer to a sign-payload request
    SignPayloadResponse,
    /// Answer to a broadcast request
    BroadcastResponse,
    /// Receipt of a request, sent before the real answer
    Acknowledge,
    /// The counterpart is going away
    Disconnect,
    /// A request failed with a domain error
    Error,
}

impl MessageType {
    /// Whether this type is a request that expects an answer
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            MessageType::PermissionRequest
                | MessageType::OperationRequest
                | MessageType::SignPayloadRequest
                | MessageType::BroadcastRequest
        )
    }
}

/// Structured request/response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMessage {
    /// Request identifier; responses reuse the request's id
    pub id: String,
    /// Protocol version
    pub version: String,
    /// Public key of the sender
    pub sender_id: String,
    /// Message kind
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Type-specific body
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl BaseMessage {
    /// Create a message with a fresh id
    pub fn new(
        sender_id: impl Into<String>,
        message_type: MessageType,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            version: PROTOCOL_VERSION.to_string(),
            sender_id: sender_id.into(),
            message_type,
            payload,
        }
    }

    /// Build the error answer to `request`.
    ///
    /// The domain error is carried in its `[KIND]:detail` text form.
    pub fn error_response(
        request: &BaseMessage,
        sender_id: impl Into<String>,
        error: &DomainError,
    ) -> Self {
        Self {
            id: request.id.clone(),
            version: PROTOCOL_VERSION.to_string(),
            sender_id: sender_id.into(),
            message_type: MessageType::Error,
            payload: serde_json::json!({
                "errorType": error.kind,
                "message": error.to_string(),
            }),
        }
    }

    /// Build the acknowledgement for `request`
    pub fn acknowledge(request: &BaseMessage, sender_id: impl Into<String>) -> Self {
        Self {
            id: request.id.clone(),
            version: PROTOCOL_VERSION.to_string(),
            sender_id: sender_id.into(),
            message_type: MessageType::Acknowledge,
            payload: serde_json::Value::Null,
        }
    }

    /// Extract the domain error carried by an `Error` message
    pub fn domain_error(&self) -> Option<DomainError> {
        if self.message_type != MessageType::Error {
            return None;
        }
        self.payload
            .get("message")
            .and_then(serde_json::Value::as_str)
            .and_then(DomainError::parse)
    }
}
