//! Post-message transport
//!
//! Sibling windows (or an extension and a page) exchange messages through a
//! shared [`MessageHub`]. Each side owns an ed25519 identity; envelopes are
//! signed by the sender and verified against the subscribed peer's key.

mod channel;
mod hub;
mod transport;

pub use channel::PostMessageChannel;
pub use hub::{Envelope, Inbox, MessageHub};
pub use transport::PostMessageTransport;
