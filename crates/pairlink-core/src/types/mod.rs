//! Shared data types

mod account;
mod connection;
mod message;
mod peer;
mod storage_key;

pub use account::AccountInfo;
pub use connection::{ConnectionContext, Origin, TransportStatus, TransportType};
pub use message::{BaseMessage, MessageType, PROTOCOL_VERSION};
pub use peer::{P2pPairingRequest, Peer, PostMessagePairingRequest};
pub use storage_key::StorageKey;
