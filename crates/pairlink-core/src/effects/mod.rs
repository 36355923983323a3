//! Capability interfaces
//!
//! The transport and client never reach for globals: everything they touch
//! outside their own state is one of these traits, injected at construction.
//!
//! | Capability     | Consumed by          | Stock handler              |
//! |----------------|----------------------|----------------------------|
//! | `Storage`      | peer/account stores  | `MemoryStorage`            |
//! | `PeerStore`    | transport            | `StoragePeerManager`       |
//! | `Channel`      | transport            | `PostMessageChannel`       |
//! | `Serializer`   | client               | `JsonSerializer`           |
//! | `AccountStore` | client               | `StorageAccountManager`    |

mod accounts;
mod channel;
mod peers;
mod serializer;
mod storage;

pub use accounts::AccountStore;
pub use channel::{Channel, InboundPayload, MessageCallback};
pub use peers::PeerStore;
pub use serializer::Serializer;
pub use storage::Storage;
