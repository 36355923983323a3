//! Pairlink Core - shared foundation for the pairing SDK
//!
//! This crate holds everything the transport and client layers agree on:
//!
//! ## Types
//! - `Peer` and the peer-info variants (`PostMessagePairingRequest`, `P2pPairingRequest`)
//! - `ConnectionContext`, `TransportStatus`, `TransportType`, `StorageKey`
//! - `BaseMessage`: the structured request/response envelope
//!
//! ## Errors
//! - `PairlinkError`: operational failures (unknown peer, decode, storage, ...)
//! - `DomainError` / `ErrorKind`: the closed taxonomy encoded into responses
//!
//! ## Capabilities (`effects`)
//! Collaborator interfaces injected by composition: `Storage`, `PeerStore`,
//! `Channel`, `Serializer`, `AccountStore`.
//!
//! ## Handlers
//! Stock implementations of those capabilities: `MemoryStorage`,
//! `StoragePeerManager`, `StorageAccountManager`, `JsonSerializer`.
//!
//! ## Primitives
//! - `ResettableFuture`: settle-once value cell that can be replaced wholesale

#![forbid(unsafe_code)]

/// Closed domain error taxonomy
pub mod domain;

/// Capability interfaces consumed by the transport and client
pub mod effects;

/// Operational error type
pub mod errors;

/// Stock capability implementations
pub mod handlers;

/// Settle-once, replaceable value cell
pub mod resettable;

/// Shared data types
pub mod types;

pub use domain::{DomainError, ErrorKind};
pub use effects::{
    AccountStore, Channel, InboundPayload, MessageCallback, PeerStore, Serializer, Storage,
};
pub use errors::{PairlinkError, Result};
pub use handlers::{JsonSerializer, MemoryStorage, StorageAccountManager, StoragePeerManager};
pub use resettable::{ResettableFuture, SettleStatus};
pub use types::{
    AccountInfo, BaseMessage, ConnectionContext, MessageType, Origin, P2pPairingRequest, Peer,
    PostMessagePairingRequest, StorageKey, TransportStatus, TransportType, PROTOCOL_VERSION,
};
