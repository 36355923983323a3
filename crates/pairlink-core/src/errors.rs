//! Operational error type for pairlink
//!
//! `PairlinkError` covers failures raised while moving messages around:
//! unknown recipients, malformed inbound payloads, storage and channel
//! faults. Domain-level refusals that travel back to the counterpart live in
//! [`crate::domain`] and are wrapped by the `Domain` variant when they need
//! to flow through a `Result`.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};

/// Unified error type for all pairlink operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PairlinkError {
    /// A send targeted a public key that is not in the peer store
    #[error("Peer unknown: {public_key}")]
    PeerUnknown {
        /// Public key that was not found
        public_key: String,
    },

    /// An inbound payload could not be decoded into a structured message
    #[error("Decode error: {reason}")]
    Decode {
        /// Why decoding failed
        reason: String,
    },

    /// The client dispatch hook was never supplied.
    ///
    /// This is an integration fault, not a recoverable condition.
    #[error("Request handler not installed: {message}")]
    HandlerNotInstalled {
        /// The request that could not be dispatched
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// The channel capability failed to deliver or subscribe
    #[error("Channel error: {message}")]
    Channel {
        /// Error message describing the channel failure
        message: String,
    },

    /// Invalid configuration
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the invalid setting
        message: String,
    },

    /// A domain error raised by a request handler
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl PairlinkError {
    /// Create an unknown peer error
    pub fn peer_unknown(public_key: impl Into<String>) -> Self {
        Self::PeerUnknown {
            public_key: public_key.into(),
        }
    }

    /// Create a decode error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Create a handler-not-installed fault
    pub fn handler_not_installed(message: impl Into<String>) -> Self {
        Self::HandlerNotInstalled {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error signals a programming fault rather than a runtime condition
    pub fn is_integration_fault(&self) -> bool {
        matches!(self, Self::HandlerNotInstalled { .. })
    }
}

/// Standard Result type for pairlink operations
pub type Result<T> = std::result::Result<T, PairlinkError>;

impl From<serde_json::Error> for PairlinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            PairlinkError::peer_unknown("abc").to_string(),
            "Peer unknown: abc"
        );
        assert_eq!(
            PairlinkError::decode("eof").to_string(),
            "Decode error: eof"
        );
    }

    #[test]
    fn test_domain_error_is_transparent() {
        let err: PairlinkError = DomainError::from_kind(ErrorKind::NotGrantedError).into();
        assert!(err.to_string().starts_with("[NOT_GRANTED_ERROR]:"));
    }

    #[test]
    fn test_integration_fault_classification() {
        assert!(PairlinkError::handler_not_installed("x").is_integration_fault());
        assert!(!PairlinkError::storage("x").is_integration_fault());
    }
}
