//! Pairlink Transport
//!
//! The transport layer moves opaque text between this side of a pairing and
//! its known peers. It is payload-format agnostic: decoding belongs to the
//! client's serializer.
//!
//! - [`Transport`]: the contract every variant implements. Shared behavior
//!   (peer lifecycle, unicast/broadcast send, listener fan-out) is provided
//!   by default methods over a [`TransportCore`].
//! - [`PostMessageTransport`]: a concrete variant over an in-process
//!   [`MessageHub`] with ed25519-signed envelopes.

pub mod core;
pub mod postmessage;

pub use crate::core::{Listener, ListenerRegistry, Transport, TransportCore};
pub use postmessage::{Envelope, MessageHub, PostMessageChannel, PostMessageTransport};
