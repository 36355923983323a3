//! Pairlink Client
//!
//! The client owns exactly one transport slot and everything layered on top
//! of it:
//!
//! - **Transport slot**: a [`ResettableFuture`](pairlink_core::ResettableFuture)
//!   that early callers (`ready`, `get_peers`, ...) wait on until the first
//!   `init`. Later swaps replace the slot wholesale.
//! - **Inbound dispatch**: textual payloads are decoded by the serializer and
//!   handed to the [`RequestHandler`]. Failures are logged and forwarded on
//!   the inbound error channel instead of reaching the transport.
//! - **Rate limiting**: an advisory sliding-window counter.
//! - **Events**: `ActiveTransportSet` is emitted on every slot change.
//!
//! Role-specific clients ([`WalletClient`], [`DAppClient`]) compose a
//! [`Client`] rather than extending it.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod rate_limit;
pub mod roles;

pub use client::Client;
pub use config::{ClientConfig, RateLimitConfig, MAX_QUEUE_CAPACITY, MAX_WINDOW_SECS};
pub use dispatch::{InboundError, NotInstalledHandler, RequestHandler};
pub use events::{ClientEvent, EventBus, EventKind};
pub use rate_limit::RateLimiter;
pub use roles::{DAppClient, WalletClient};
