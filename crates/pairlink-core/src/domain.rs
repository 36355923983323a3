//! Closed domain error taxonomy
//!
//! Domain errors are the refusals a wallet-side handler sends back to the
//! requesting app. Each carries a closed [`ErrorKind`] and a detail string,
//! and renders to the stable wire text `[KIND]:detail`.
//!
//! [`DomainError::from_kind`] is a total match over `ErrorKind`: adding a
//! kind without extending it fails to build. `BroadcastError` currently
//! yields the network-not-supported value; that mapping is kept as observed
//! in deployed counterparts until a product decision says otherwise.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of domain error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Broadcasting a signed operation failed
    #[serde(rename = "BROADCAST_ERROR")]
    BroadcastError,
    /// The requested network is not supported
    #[serde(rename = "NETWORK_NOT_SUPPORTED")]
    NetworkNotSupported,
    /// No address is available for the request
    #[serde(rename = "NO_ADDRESS_ERROR")]
    NoAddressError,
    /// No private key matches the requested account
    #[serde(rename = "NO_PRIVATE_KEY_FOUND_ERROR")]
    NoPrivateKeyFoundError,
    /// The user declined the request
    #[serde(rename = "NOT_GRANTED_ERROR")]
    NotGrantedError,
    /// The request parameters are invalid
    #[serde(rename = "PARAMETERS_INVALID_ERROR")]
    ParametersInvalidError,
    /// The request contains too many operations
    #[serde(rename = "TOO_MANY_OPERATIONS")]
    TooManyOperations,
    /// The transaction is invalid
    #[serde(rename = "TRANSACTION_INVALID_ERROR")]
    TransactionInvalidError,
    /// Anything else
    #[serde(rename = "UNKNOWN_ERROR")]
    UnknownError,
}

impl ErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::BroadcastError,
        ErrorKind::NetworkNotSupported,
        ErrorKind::NoAddressError,
        ErrorKind::NoPrivateKeyFoundError,
        ErrorKind::NotGrantedError,
        ErrorKind::ParametersInvalidError,
        ErrorKind::TooManyOperations,
        ErrorKind::TransactionInvalidError,
        ErrorKind::UnknownError,
    ];

    /// Stable wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BroadcastError => "BROADCAST_ERROR",
            ErrorKind::NetworkNotSupported => "NETWORK_NOT_SUPPORTED",
            ErrorKind::NoAddressError => "NO_ADDRESS_ERROR",
            ErrorKind::NoPrivateKeyFoundError => "NO_PRIVATE_KEY_FOUND_ERROR",
            ErrorKind::NotGrantedError => "NOT_GRANTED_ERROR",
            ErrorKind::ParametersInvalidError => "PARAMETERS_INVALID_ERROR",
            ErrorKind::TooManyOperations => "TOO_MANY_OPERATIONS",
            ErrorKind::TransactionInvalidError => "TRANSACTION_INVALID_ERROR",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown error kind: {s}"))
    }
}

/// A domain error: closed kind plus human-readable detail
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[error("[{kind}]:{detail}")]
pub struct DomainError {
    /// Which kind of refusal this is
    pub kind: ErrorKind,
    /// Detail text shown to the counterpart
    pub detail: String,
}

impl DomainError {
    /// Create a domain error with a custom detail
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Map a kind to its canonical error value.
    pub fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::BroadcastError => Self::network_not_supported(),
            ErrorKind::NetworkNotSupported => Self::network_not_supported(),
            ErrorKind::NoAddressError => Self::no_address(),
            ErrorKind::NoPrivateKeyFoundError => Self::no_private_key(),
            ErrorKind::NotGrantedError => Self::not_granted(),
            ErrorKind::ParametersInvalidError => Self::parameters_invalid(),
            ErrorKind::TooManyOperations => Self::too_many_operations(),
            ErrorKind::TransactionInvalidError => Self::transaction_invalid(),
            ErrorKind::UnknownError => Self::unknown(),
        }
    }

    /// The transaction could not be broadcast
    pub fn broadcast() -> Self {
        Self::new(
            ErrorKind::BroadcastError,
            "The transaction could not be broadcast to the network.",
        )
    }

    /// The wallet does not support the requested network
    pub fn network_not_supported() -> Self {
        Self::new(
            ErrorKind::NetworkNotSupported,
            "The wallet does not support this network. Please select another one.",
        )
    }

    /// No address is associated with the request
    pub fn no_address() -> Self {
        Self::new(
            ErrorKind::NoAddressError,
            "The wallet does not have an account set up.",
        )
    }

    /// The account has no private key on this wallet
    pub fn no_private_key() -> Self {
        Self::new(
            ErrorKind::NoPrivateKeyFoundError,
            "The account you are trying to interact with is not available.",
        )
    }

    /// The request was declined
    pub fn not_granted() -> Self {
        Self::new(
            ErrorKind::NotGrantedError,
            "You do not have the necessary permissions to perform this action.",
        )
    }

    /// The request parameters were rejected
    pub fn parameters_invalid() -> Self {
        Self::new(
            ErrorKind::ParametersInvalidError,
            "Some of the parameters you provided are invalid.",
        )
    }

    /// Too many operations in one request
    pub fn too_many_operations() -> Self {
        Self::new(
            ErrorKind::TooManyOperations,
            "The request contains too many transactions.",
        )
    }

    /// The transaction was rejected
    pub fn transaction_invalid() -> Self {
        Self::new(
            ErrorKind::TransactionInvalidError,
            "The transaction is invalid and the node did not accept it.",
        )
    }

    /// Anything else
    pub fn unknown() -> Self {
        Self::new(ErrorKind::UnknownError, "An unknown error occurred.")
    }

    /// Parse the `[KIND]:detail` wire form
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('[')?;
        let (kind, detail) = rest.split_once("]:")?;
        let kind = kind.parse().ok()?;
        Some(Self::new(kind, detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display_uses_bracketed_kind() {
        let err = DomainError::new(ErrorKind::NoAddressError, "nothing here");
        assert_eq!(err.to_string(), "[NO_ADDRESS_ERROR]:nothing here");
    }

    #[test]
    fn test_factory_values_are_distinct_except_broadcast() {
        let broadcast = DomainError::from_kind(ErrorKind::BroadcastError);
        let network = DomainError::from_kind(ErrorKind::NetworkNotSupported);
        assert_eq!(broadcast, network);
        assert_eq!(broadcast.kind, ErrorKind::NetworkNotSupported);

        let distinct: HashSet<DomainError> = ErrorKind::ALL
            .into_iter()
            .filter(|kind| *kind != ErrorKind::BroadcastError)
            .map(DomainError::from_kind)
            .collect();
        assert_eq!(distinct.len(), ErrorKind::ALL.len() - 1);
    }

    #[test]
    fn test_factory_preserves_kind_for_non_broadcast() {
        for kind in ErrorKind::ALL {
            if kind == ErrorKind::BroadcastError {
                continue;
            }
            assert_eq!(DomainError::from_kind(kind).kind, kind);
        }
    }

    #[test]
    fn test_kind_serde_names_match_wire_names() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<ErrorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_wire_form() {
        let err = DomainError::parse("[TOO_MANY_OPERATIONS]:slow down: please").unwrap();
        assert_eq!(err.kind, ErrorKind::TooManyOperations);
        assert_eq!(err.detail, "slow down: please");

        assert!(DomainError::parse("TOO_MANY_OPERATIONS:x").is_none());
        assert!(DomainError::parse("[NOPE]:x").is_none());
    }
}
